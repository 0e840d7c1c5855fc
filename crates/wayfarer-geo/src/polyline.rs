//! Encoded polyline codec, as used by standard directions APIs.
//!
//! Each coordinate is stored as a delta from the previous one, scaled by
//! 10^precision, zigzag sign-folded, and written 5 bits at a time with a
//! continuation bit (0x20), offset by 63 into printable ASCII.
//! Pairs are encoded latitude first.

use wayfarer_core::types::GeoCoordinate;

/// Google / OSRM default precision.
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const ASCII_OFFSET: i64 = 63;
/// Twelve chunks (60 bits) is the widest value a varint may carry.
const MAX_SHIFT: u32 = 55;

/// Decode an encoded polyline into coordinates.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<GeoCoordinate>, String> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = lat
            .checked_add(decode_value(bytes, &mut index)?)
            .ok_or("polyline coordinate overflow")?;
        if index >= bytes.len() {
            return Err(format!(
                "polyline truncated: latitude without longitude at byte {index}"
            ));
        }
        lng = lng
            .checked_add(decode_value(bytes, &mut index)?)
            .ok_or("polyline coordinate overflow")?;

        let point = GeoCoordinate::new(lng as f64 / factor, lat as f64 / factor);
        if !(point.lat.abs() <= 90.0 && point.lng.abs() <= 180.0) {
            return Err(format!(
                "polyline coordinate out of range ({}, {}) ending at byte {index}",
                point.lng, point.lat
            ));
        }
        points.push(point);
    }

    Ok(points)
}

/// Read one zigzag-folded varint starting at `index`.
fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, String> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(format!("polyline truncated at byte {}", *index));
        };
        if !(63..=126).contains(&byte) {
            return Err(format!(
                "invalid polyline character {:?} at byte {}",
                byte as char, *index
            ));
        }
        if shift > MAX_SHIFT {
            return Err(format!("polyline value overflow at byte {}", *index));
        }
        *index += 1;

        let chunk = byte as i64 - ASCII_OFFSET;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode coordinates into a polyline string.
pub fn encode(points: &[GeoCoordinate], precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * factor).round() as i64;
        let lng = (point.lng * factor).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = delta << 1;
    if delta < 0 {
        value = !value;
    }
    while value >= CONTINUATION_BIT {
        out.push((((value & CHUNK_MASK) | CONTINUATION_BIT) + ASCII_OFFSET) as u8 as char);
        value >>= 5;
    }
    out.push((value + ASCII_OFFSET) as u8 as char);
}
