//! Raster images as PDF image XObjects.
//!
//! JPEG data in gray or RGB passes through with `DCTDecode`. Everything
//! else is decoded, composited onto white and stored as 8-bit DeviceRGB
//! with `FlateDecode`, so no image carries transparency.

use crate::fonts::flate_compress;
use image::{ColorType, GenericImageView, ImageFormat};
use lopdf::{Stream, dictionary};

#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
}

pub fn decode_image(data: &[u8]) -> Result<ImageXObject, String> {
    let format = image::guess_format(data).map_err(|e| e.to_string())?;
    let decoded = image::load_from_memory(data).map_err(|e| e.to_string())?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }

    let passthrough = match (format, decoded.color()) {
        (ImageFormat::Jpeg, ColorType::L8) => Some("DeviceGray"),
        (ImageFormat::Jpeg, ColorType::Rgb8) => Some("DeviceRGB"),
        _ => None,
    };
    if let Some(color_space) = passthrough {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        return Ok(ImageXObject {
            width,
            height,
            stream: Stream::new(dict, data.to_vec()),
        });
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        for channel in [r, g, b] {
            rgb.push(over_white(channel, a));
        }
    }
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    let content = flate_compress(&rgb).map_err(|e| e.to_string())?;
    Ok(ImageXObject {
        width,
        height,
        stream: Stream::new(dict, content),
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32 * alpha as u32 + 255 * (255 - alpha as u32);
    ((c + 127) / 255) as u8
}
