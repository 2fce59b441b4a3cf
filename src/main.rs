use std::fs;
use std::path::Path;

use clap::Parser;

use stegano::cli::Cli;
use stegano::error::{Result, StegError};
use stegano::io::write_atomically;
use stegano::jpeg::{container, decoder, scanner};
use stegano::steg;

fn print_meta_data(header: &stegano::jpeg::header::Header) {
    println!("precision:        {}", header.precision);
    println!("dimensions:       {}x{}", header.width, header.height);
    println!(
        "colour mode:      {}",
        if header.is_color() { "YCbCr (3 components)" } else { "grayscale (1 component)" }
    );
    for (index, component) in header.components.iter().enumerate() {
        println!(
            "component[{index}]:     id={} sampling={}x{} quant_table={} dc_huff={} ac_huff={}",
            component.identifier,
            component.h_samp,
            component.v_samp,
            component.quant_table_number,
            component.dc_huff_id,
            component.ac_huff_id
        );
    }
    println!("quant tables:     {}", header.quant_tables.len());
    println!("restart interval: {}", header.restart_interval);
}

fn run() -> Result<()> {
    let args = Cli::parse();

    let cover_bytes = fs::read(&args.cover_image)?;
    let header = scanner::scan(&cover_bytes)?;

    if args.meta_data {
        print_meta_data(&header);
    }

    if args.embed {
        let secret_path = args.secret_file.as_ref().ok_or_else(|| {
            StegError::invalid_container("--embed requires a SECRET_FILE argument")
        })?;
        let output_path = args.stego_image.as_ref().ok_or_else(|| {
            StegError::invalid_container("--embed requires a STEGO_IMAGE output path")
        })?;

        let secret_bytes = fs::read(secret_path)?;
        let basename = Path::new(secret_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| secret_path.clone());

        let decoded = decoder::decode(&cover_bytes, &header)?;
        let mut mcus = decoded.mcus;
        steg::embed(&mut mcus, decoded.capacity_bits, &secret_bytes, &basename)?;
        let output_bytes = container::assemble(&header, &mcus)?;
        write_atomically(Path::new(output_path), &output_bytes)?;
        println!("embedded {} bytes into {output_path}", secret_bytes.len());
    } else if args.retrieve {
        let decoded = decoder::decode(&cover_bytes, &header)?;
        let recovered = steg::extract(&decoded.mcus)?;

        let output_dir = args.stego_image.as_deref().unwrap_or(".");
        let output_path = Path::new(output_dir).join(&recovered.basename);
        fs::write(&output_path, &recovered.contents)?;
        println!(
            "recovered {} bytes as {}",
            recovered.contents.len(),
            output_path.display()
        );
    } else if !args.meta_data {
        return Err(StegError::invalid_container(
            "one of --embed or --retrieve is required",
        ));
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
