use clap::{App, Arg, SubCommand};
use favicon_gen::{packbits, FaviconOptions, ImageInfo};
use std::fs;
use std::io;
use std::path::PathBuf;

//===========================================================================//

fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();
    let matches = App::new("favicon_tool")
        .version("0.1")
        .about("Generates favicon sets and packs icon data")
        .subcommand(
            SubCommand::with_name("generate")
                .about("Generates favicon files from square PNG images")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("DIR")
                        .short("o")
                        .long("output")
                        .help("Sets output directory"),
                )
                .arg(
                    Arg::with_name("name")
                        .takes_value(true)
                        .value_name("NAME")
                        .long("name")
                        .help("Sets the ICO file name, without extension"),
                )
                .arg(Arg::with_name("image").multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("pack")
                .about("PackBits-encodes a file")
                .arg(Arg::with_name("input").required(true))
                .arg(Arg::with_name("output").required(true)),
        )
        .subcommand(
            SubCommand::with_name("unpack")
                .about("PackBits-decodes a file")
                .arg(Arg::with_name("input").required(true))
                .arg(Arg::with_name("output").required(true)),
        )
        .subcommand(
            SubCommand::with_name("sizes")
                .about("Lists the image sizes a favicon set needs"),
        )
        .get_matches();
    if let Some(submatches) = matches.subcommand_matches("generate") {
        let out_dir =
            PathBuf::from(submatches.value_of("output").unwrap_or("."));
        let mut options = FaviconOptions::default();
        if let Some(name) = submatches.value_of("name") {
            options = options.with_ico_name(name);
        }
        let mut images = Vec::new();
        if let Some(paths) = submatches.values_of("image") {
            for path in paths {
                let size = read_png_size(path)?;
                println!("Adding {:?} ({}x{})", path, size, size);
                images.push(ImageInfo::new(size, path));
            }
        }
        fs::create_dir_all(&out_dir)?;
        for path in favicon_gen::generate_favicon(&images, &out_dir, &options)?
        {
            println!("{}", path.display());
        }
    } else if let Some(submatches) = matches.subcommand_matches("pack") {
        let input = fs::read(submatches.value_of("input").unwrap())?;
        let output = packbits::encode(&input);
        println!("{} bytes -> {} bytes", input.len(), output.len());
        fs::write(submatches.value_of("output").unwrap(), output)?;
    } else if let Some(submatches) = matches.subcommand_matches("unpack") {
        let input = fs::read(submatches.value_of("input").unwrap())?;
        let output = packbits::decode(&input)?;
        println!("{} bytes -> {} bytes", input.len(), output.len());
        fs::write(submatches.value_of("output").unwrap(), output)?;
    } else if matches.subcommand_matches("sizes").is_some() {
        for size in favicon_gen::required_image_sizes() {
            let png = favicon_gen::png_file_name(size).unwrap_or("-");
            let ico =
                favicon_gen::REQUIRED_ICO_IMAGE_SIZES.contains(&size);
            println!("{:5}: {} {}", size, png, if ico { "ico" } else { "" });
        }
    }
    Ok(())
}

// Returns the side length of a square PNG file.
fn read_png_size(path: &str) -> io::Result<u32> {
    let decoder = png::Decoder::new(fs::File::open(path)?);
    let reader = decoder
        .read_info()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
    let info = reader.info();
    if info.width != info.height {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is {}x{}, not square", path, info.width, info.height),
        ));
    }
    Ok(info.width)
}

//===========================================================================//
