use argh::FromArgs;
use image::{ImageFormat, RgbImage, RgbaImage};
use qoif::{Channels, ColorSpace, ImageDesc};
use std::{fs::File, io::BufReader, num::NonZeroU32, str::FromStr};

/// qoif cli encoder and decoder.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Encode(Encode),
    EncodeRaw(EncodeRaw),
    Decode(Decode),
    DecodeRaw(DecodeRaw),
}

#[derive(Debug)]
enum Format {
    Png,
    Jpg,
    Bmp,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("png").then_some(Format::Png)
               .or_else(|| s.eq_ignore_ascii_case("jpg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("bmp").then_some(Format::Bmp))
        else { return Err("invalid string"); };

        Ok(format)
    }
}

impl From<Format> for ImageFormat {
    fn from(f: Format) -> ImageFormat {
        match f {
            Format::Png => ImageFormat::Png,
            Format::Jpg => ImageFormat::Jpeg,
            Format::Bmp => ImageFormat::Bmp,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { command } = argh::from_env();

    match command {
        Command::Encode(options) => encode(options),
        Command::EncodeRaw(options) => encode_raw(options),
        Command::Decode(options) => decode(options),
        Command::DecodeRaw(options) => decode_raw(options),
    }
}

/// Encodes an image (PNG/JPG/BMP, or guessed from its contents) as qoif.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode")]
struct Encode {
    /// input format, optional (png, jpg, bmp)
    #[argh(option)]
    format: Option<Format>,

    /// keep the alpha channel (4 channels); defaults to RGB-only (3 channels)
    #[argh(switch)]
    alpha: bool,

    /// the input image file
    #[argh(positional)]
    input: String,
    /// the output qoif file
    #[argh(positional)]
    output: String,
}

fn encode(options: Encode) -> Result<(), Box<dyn std::error::Error>> {
    let Encode { format, alpha, input, output } = options;

    let image = match format {
        Some(format) => image::io::Reader::with_format(
            BufReader::new(File::open(&input)?),
            ImageFormat::from(format),
        )
        .decode()?,
        None => image::io::Reader::open(input)?.with_guessed_format()?.decode()?,
    };

    let width = image.width();
    let height = image.height();

    println!("Encoding {width}x{height} image");

    let (channels, pixels) = if alpha {
        (Channels::Rgba, image.into_rgba8().into_raw())
    } else {
        (Channels::Rgb, image.into_rgb8().into_raw())
    };

    let desc = ImageDesc::new(width, height, channels, ColorSpace::Srgb);
    let bytes = qoif::encode(&pixels, desc)?;

    std::fs::write(&output, &bytes)?;
    println!("Written {} bytes to `{output}`", bytes.len());

    Ok(())
}

/// Encodes a raw interleaved RGB/RGBA buffer as qoif.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode-raw")]
struct EncodeRaw {
    /// image width
    #[argh(option)]
    width: NonZeroU32,
    /// image height
    #[argh(option)]
    height: NonZeroU32,
    /// channels in the input buffer: 3 (rgb) or 4 (rgba)
    #[argh(option, default = "4")]
    channels: u8,

    /// the raw input file
    #[argh(positional)]
    input: String,
    /// the output qoif file
    #[argh(positional)]
    output: String,
}

fn encode_raw(options: EncodeRaw) -> Result<(), Box<dyn std::error::Error>> {
    let EncodeRaw { width, height, channels, input, output } = options;

    println!("Encoding {width}x{height} image");

    let pixels = std::fs::read(input)?;
    let channels = Channels::try_from(channels).map_err(|e| format!("{e}"))?;
    let desc = ImageDesc::new(width.get(), height.get(), channels, ColorSpace::Srgb);

    let bytes = qoif::encode(&pixels, desc).map_err(|e| format!("{e}"))?;

    std::fs::write(&output, &bytes)?;
    println!("Written {} bytes to `{output}`", bytes.len());

    Ok(())
}

/// Decodes a qoif image into a PNG/JPG/BMP file.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode")]
struct Decode {
    /// output format (png, jpg, bmp)
    #[argh(option)]
    format: Format,

    /// the input qoif file
    #[argh(positional)]
    input: String,
    /// the output image file
    #[argh(positional)]
    output: String,
}

fn decode(options: Decode) -> Result<(), Box<dyn std::error::Error>> {
    let Decode { format, input, output } = options;

    let qoif_input = std::fs::read(&input)?;

    println!("Decoding `{input}`");

    let (pixels, desc) = qoif::decode(&qoif_input, 0).map_err(|e| format!("{e}"))?;

    match desc.channels {
        Channels::Rgb => RgbImage::from_vec(desc.width, desc.height, pixels)
            .ok_or("failed to create image")?
            .save_with_format(&output, ImageFormat::from(format))?,
        Channels::Rgba => RgbaImage::from_vec(desc.width, desc.height, pixels)
            .ok_or("failed to create image")?
            .save_with_format(&output, ImageFormat::from(format))?,
    }

    println!("Written {}x{} image to `{output}`", desc.width, desc.height);

    Ok(())
}

/// Decodes a qoif image into a raw interleaved RGB/RGBA buffer.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode-raw")]
struct DecodeRaw {
    /// force the output channel count: 3 (rgb) or 4 (rgba); default is the
    /// source header's own channel count
    #[argh(option, default = "0")]
    channels: u8,

    /// the input qoif file
    #[argh(positional)]
    input: String,
    /// the output raw file
    #[argh(positional)]
    output: String,
}

fn decode_raw(options: DecodeRaw) -> Result<(), Box<dyn std::error::Error>> {
    let DecodeRaw { channels, input, output } = options;

    let qoif_input = std::fs::read(&input)?;

    println!("Decoding `{input}`");

    let (pixels, desc) = qoif::decode(&qoif_input, channels).map_err(|e| format!("{e}"))?;

    std::fs::write(&output, &pixels)?;

    println!("Written {}x{} image to `{output}`", desc.width, desc.height);

    Ok(())
}
