use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Seek, SeekFrom, Write};

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

// The resource type number for icons (as opposed to cursors, which this
// crate never writes).
const ICON_RESOURCE_TYPE: u16 = 1;

// Sizes of the ICONDIR header and of each ICONDIRENTRY, in bytes.
const ICONDIR_LEN: u32 = 6;
const ICONDIRENTRY_LEN: u32 = 16;

// The largest width/height that an ICONDIRENTRY can describe.
const MAX_SIZE: u32 = 256;

//===========================================================================//

/// A collection of PNG-encoded icon images; the contents of a single ICO
/// file.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a new, empty icon collection.
    pub fn new() -> IconDir {
        IconDir { entries: Vec::new() }
    }

    /// Returns the entries in this collection.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Adds an entry to the end of the collection.
    pub fn add_entry(&mut self, entry: IconDirEntry) {
        self.entries.push(entry);
    }

    /// Sorts the entries by ascending size, as favicon consumers expect.
    pub fn sort_entries(&mut self) {
        self.entries.sort_by_key(|entry| (entry.width, entry.height));
    }

    /// Reads an ICO file into memory.  Returns an error of kind
    /// `InvalidData` if the file is malformed or truncated.
    pub fn read<R: Read + Seek>(reader: R) -> io::Result<IconDir> {
        IconDir::read_internal(reader).map_err(|error| {
            if error.kind() == io::ErrorKind::UnexpectedEof {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Truncated ICO file: {}", error),
                )
            } else {
                error
            }
        })
    }

    fn read_internal<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_RESOURCE_TYPE {
            invalid_data!(
                "Unsupported resource type (was {}, but must be {})",
                restype,
                ICON_RESOURCE_TYPE
            );
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        let mut spans = Vec::<(u32, u32)>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let _num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let _color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            spans.push((data_offset, data_size));
            entries.push(IconDirEntry {
                width: size_from_byte(width_byte),
                height: size_from_byte(height_byte),
                bits_per_pixel,
                data: Vec::new(),
            });
        }
        let stream_len = reader.seek(SeekFrom::End(0))?;
        for (entry, &(data_offset, data_size)) in
            entries.iter_mut().zip(spans.iter())
        {
            // Check the span before allocating a buffer for it.
            let data_end = data_offset as u64 + data_size as u64;
            if data_end > stream_len {
                invalid_data!(
                    "ICONDIRENTRY data extends past end of file \
                     (ends at {}, but file is {} bytes)",
                    data_end,
                    stream_len
                );
            }
            reader.seek(SeekFrom::Start(data_offset as u64))?;
            let mut data = vec![0u8; data_size as usize];
            reader.read_exact(&mut data)?;
            entry.data = data;
        }
        Ok(IconDir { entries })
    }

    /// Writes an ICO file out.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.entries.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many entries in IconDir (was {}, but max is {})",
                self.entries.len(),
                u16::MAX
            );
        }
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        let mut data_offset =
            ICONDIR_LEN + ICONDIRENTRY_LEN * (self.entries.len() as u32);
        for entry in self.entries.iter() {
            writer.write_u8(size_to_byte(entry.width))?;
            writer.write_u8(size_to_byte(entry.height))?;
            writer.write_u8(0)?; // no color table
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(1)?; // color planes
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            let data_size = entry.data.len() as u32;
            writer.write_u32::<LittleEndian>(data_size)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
            data_offset += data_size;
        }
        for entry in self.entries.iter() {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }
}

//===========================================================================//

/// One image in an ICO file, stored as PNG data.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDirEntry {
    width: u32,
    height: u32,
    bits_per_pixel: u16,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Wraps a complete PNG file in a new entry, taking the dimensions and
    /// color depth from its header.  Returns an error if `data` is not a PNG
    /// or if the image is larger than 256x256.
    pub fn from_png_data(data: Vec<u8>) -> io::Result<IconDirEntry> {
        if !data.starts_with(PNG_SIGNATURE) {
            invalid_input!("Icon image data is not a PNG file");
        }
        let (width, height, bits_per_pixel) = {
            let decoder = png::Decoder::new(data.as_slice());
            let png_reader = match decoder.read_info() {
                Ok(png_reader) => png_reader,
                Err(error) => invalid_input!("Malformed PNG data: {}", error),
            };
            let info = png_reader.info();
            let bits_per_pixel =
                info.color_type.samples() * (info.bit_depth as usize);
            (info.width, info.height, bits_per_pixel as u16)
        };
        if width > MAX_SIZE || height > MAX_SIZE {
            invalid_input!(
                "Icon image is too large (was {}x{}, but max is {}x{})",
                width,
                height,
                MAX_SIZE,
                MAX_SIZE
            );
        }
        Ok(IconDirEntry { width, height, bits_per_pixel, data })
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the bits-per-pixel (color depth) of the image.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns true if the entry's data is a PNG file.  Entries read from
    /// older ICO files may hold BMP data instead.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

//===========================================================================//

// A width/height byte of zero means 256.
fn size_from_byte(byte: u8) -> u32 {
    if byte == 0 {
        MAX_SIZE
    } else {
        byte as u32
    }
}

fn size_to_byte(size: u32) -> u8 {
    if size >= MAX_SIZE {
        0
    } else {
        size as u8
    }
}

//===========================================================================//

#[cfg(test)]
pub(crate) mod tests {
    use super::{IconDir, IconDirEntry};
    use std::io::{self, Cursor};

    /// Encodes a solid-color RGBA PNG of the given size.
    pub(crate) fn solid_png(
        width: u32,
        height: u32,
        rgba: [u8; 4],
    ) -> Vec<u8> {
        let mut data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut data, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            let pixels: Vec<u8> = rgba
                .iter()
                .cloned()
                .cycle()
                .take((4 * width * height) as usize)
                .collect();
            writer.write_image_data(&pixels).unwrap();
        }
        data
    }

    #[test]
    fn read_empty_icon_set() {
        let input = b"\x00\x00\x01\x00\x00\x00";
        let icondir = IconDir::read(Cursor::new(input)).unwrap();
        assert_eq!(icondir.entries().len(), 0);
    }

    #[test]
    fn read_cursor_set_fails() {
        let input = b"\x00\x00\x02\x00\x00\x00";
        let error = IconDir::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_bad_reserved_field_fails() {
        let input = b"\x01\x00\x01\x00\x00\x00";
        let error = IconDir::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn write_empty_icon_set() {
        let icondir = IconDir::new();
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        let expected: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn write_single_png_entry() {
        let png = solid_png(16, 16, [255, 0, 0, 255]);
        let mut icondir = IconDir::new();
        icondir.add_entry(IconDirEntry::from_png_data(png.clone()).unwrap());
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        let header: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \x10\x10\x00\x00\x01\x00\x20\x00";
        assert_eq!(&output[..14], header);
        let size = (png.len() as u32).to_le_bytes();
        assert_eq!(&output[14..18], &size);
        assert_eq!(&output[18..22], &[22, 0, 0, 0]);
        assert_eq!(&output[22..], png.as_slice());
    }

    #[test]
    fn entry_rejects_non_png_data() {
        let error =
            IconDirEntry::from_png_data(b"BM not a png".to_vec()).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn entry_rejects_oversized_png() {
        let png = solid_png(257, 1, [0, 0, 0, 255]);
        let error = IconDirEntry::from_png_data(png).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn size_256_is_stored_as_zero() {
        let png = solid_png(256, 256, [0, 0, 255, 255]);
        let mut icondir = IconDir::new();
        icondir.add_entry(IconDirEntry::from_png_data(png).unwrap());
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        assert_eq!(&output[6..8], &[0, 0]);
        let icondir = IconDir::read(Cursor::new(&output)).unwrap();
        assert_eq!(icondir.entries()[0].width(), 256);
        assert_eq!(icondir.entries()[0].height(), 256);
    }

    #[test]
    fn icon_set_round_trip() {
        let mut icondir = IconDir::new();
        for &size in [48, 16, 32].iter() {
            let png = solid_png(size, size, [size as u8, 0, 0, 255]);
            icondir.add_entry(IconDirEntry::from_png_data(png).unwrap());
        }
        icondir.sort_entries();
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        let read_back = IconDir::read(Cursor::new(&output)).unwrap();
        let sizes: Vec<u32> =
            read_back.entries().iter().map(|entry| entry.width()).collect();
        assert_eq!(sizes, vec![16, 32, 48]);
        assert_eq!(read_back.entries(), icondir.entries());
        assert!(read_back.entries().iter().all(|entry| entry.is_png()));
    }

    #[test]
    fn read_truncated_data_fails() {
        let mut icondir = IconDir::new();
        let png = solid_png(2, 2, [0, 255, 0, 255]);
        icondir.add_entry(IconDirEntry::from_png_data(png).unwrap());
        let mut output = Vec::<u8>::new();
        icondir.write(&mut output).unwrap();
        output.truncate(output.len() - 1);
        let error = IconDir::read(Cursor::new(&output)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_truncated_directory_fails() {
        let input = b"\x00\x00\x01\x00\x01\x00\x10";
        let error = IconDir::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        let input = b"\x00\x00\x01";
        let error = IconDir::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_oversized_data_span_fails() {
        // A single entry claiming 0x7fffffff bytes of data at offset 22.
        let input: &[u8] = b"\
            \x00\x00\x01\x00\x01\x00\
            \x10\x10\x00\x00\x01\x00\x20\x00\
            \xff\xff\xff\x7f\x16\x00\x00\x00";
        let error = IconDir::read(Cursor::new(input)).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }
}

//===========================================================================//
