use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Red.on_default() | Effects::BOLD)
        .usage(AnsiColor::Red.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
}

/// `stegano`: a JSteg-style JPEG steganography tool.
///
/// `--embed` hides `SECRET_FILE` inside `COVER_IMAGE`'s AC coefficients and
/// writes the result to `STEGO_IMAGE`. `--retrieve` recovers a previously
/// hidden file from `COVER_IMAGE` (read as the stego image) and writes it
/// under its embedded basename into the directory named by `STEGO_IMAGE`,
/// defaulting to the current directory.
#[derive(Parser, Debug)]
#[command(
    author = "Mahmoud Harmouch",
    version,
    about = "\x1b[38;5;214mA JSteg-style JPEG steganography tool.\x1b[0m",
    name = "stegano",
    styles = styles()
)]
pub struct Cli {
    /// Embeds SECRET_FILE into COVER_IMAGE's AC coefficients.
    #[arg(short = 'e', long = "embed", conflicts_with = "retrieve")]
    pub embed: bool,

    /// Recovers a previously embedded file from COVER_IMAGE.
    #[arg(short = 'r', long = "retrieve", conflicts_with = "embed")]
    pub retrieve: bool,

    /// Prints the parsed JPEG header instead of (or before) acting.
    #[arg(short = 'm', long = "meta-data", default_value_t = false)]
    pub meta_data: bool,

    /// The cover image for `--embed`, or the stego image for `--retrieve`.
    pub cover_image: String,

    /// The file to hide. Required with `--embed`, ignored otherwise.
    pub secret_file: Option<String>,

    /// The output path for `--embed`; the output directory for
    /// `--retrieve` (defaults to the current directory).
    pub stego_image: Option<String>,
}
