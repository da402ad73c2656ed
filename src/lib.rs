#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

//! PPAL (Partial PALette) tools.
//!
//! A PPAL records the palette slots a family of paletted images agree on. [`extract`] derives one
//! from a set of images, [`splice`] merges one back into an image whose own colours get moved out
//! of the way, and [`ppal`] reads and writes the file format.

pub const NUM_SLOTS: usize = 256;
pub const RGB_SIZE: usize = 3;

pub type Rgb = [u8; RGB_SIZE];
pub type Palette = [Rgb; NUM_SLOTS];

pub use error::{Error, Result};

pub mod error {
	use std::io;

	pub type Result<T, E = Error> = core::result::Result<T, E>;

	#[derive(Debug, thiserror::Error)]
	pub enum Error {
		#[error("this is not a PPAL file")]
		Format,

		#[error("truncated PPAL: {expected} bytes declared, {available} present")]
		Truncated { expected: u64, available: usize },

		#[error("duplicate palette index {0}")]
		DuplicateIndex(u8),

		#[error("{0}")]
		InvalidInput(&'static str),

		#[error("there is no free space in this PPAL")]
		NoFreeSpace,

		#[error("this PPAL is fragmented, this is not currently supported")]
		FragmentedPalette { freeStart: usize, runLen: usize, freeCount: usize },

		#[error("pixel index {index} moved by {freeStart} slots falls off the palette")]
		IndexOutOfRange { index: u8, freeStart: usize },

		#[error("not a paletted image")]
		NotPaletted,

		#[error(transparent)]
		Decoding(#[from] png::DecodingError),

		#[error(transparent)]
		Encoding(#[from] png::EncodingError),

		#[error("bad manifest: {0}")]
		Manifest(#[from] toml::de::Error),

		#[error(transparent)]
		Io(#[from] io::Error),
	}
}

/// PPAL file format.
///
/// `[ "PPAL" ] [ count ] [ entry ]*`
///
/// * `count` is an unsigned 4-byte little-endian integer. It never exceeds 256 in files this crate
///   writes, the width just rounds the header up to 8 bytes.
/// * each `entry` is 4 unsigned bytes: the palette slot, then red, green and blue.
pub mod ppal {
	use {
		crate::{
			error::{Error, Result},
			Rgb, NUM_SLOTS,
		},
		byteorder::{ReadBytesExt, WriteBytesExt, LE},
		core::{fmt, mem},
		serde::{Deserialize, Serialize},
		std::io::{self, Read, Write},
	};

	pub const MAGIC_STR: &str = "PPAL";
	pub const MAGIC: [u8; 4] = *b"PPAL";
	pub const HEADER_SIZE: usize = MAGIC.len() + mem::size_of::<u32>();
	pub const ENTRY_SIZE: usize = 4;

	#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
	pub struct PaletteEntry {
		pub index: u8,
		pub r: u8,
		pub g: u8,
		pub b: u8,
	}

	impl PaletteEntry {
		#[must_use]
		pub const fn new(index: u8, rgb: Rgb) -> Self {
			Self { index, r: rgb[0], g: rgb[1], b: rgb[2] }
		}

		#[must_use]
		pub const fn rgb(self) -> Rgb {
			[self.r, self.g, self.b]
		}

		const fn toBytes(self) -> [u8; ENTRY_SIZE] {
			[self.index, self.r, self.g, self.b]
		}
	}

	impl fmt::Display for PaletteEntry {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			let Self { index, r, g, b } = self;
			write!(f, "({index},{r},{g},{b})")
		}
	}

	#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
	pub struct Ppal {
		#[serde(rename = "entry", default)]
		entries: Vec<PaletteEntry>,
	}

	impl Ppal {
		/// Wraps `entries` as they are. Use [`Ppal::validate`] when they come from somewhere untrusted.
		#[must_use]
		pub fn fromEntries(entries: Vec<PaletteEntry>) -> Self {
			Self { entries }
		}

		#[must_use]
		pub fn entries(&self) -> &[PaletteEntry] {
			&self.entries
		}

		#[must_use]
		pub fn len(&self) -> usize {
			self.entries.len()
		}

		#[must_use]
		pub fn is_empty(&self) -> bool {
			self.entries.is_empty()
		}

		#[must_use]
		pub fn encodedLen(&self) -> usize {
			HEADER_SIZE + ENTRY_SIZE * self.len()
		}

		/// Fails on the first slot index that appears twice.
		pub fn validate(&self) -> Result<()> {
			let mut seen = [false; NUM_SLOTS];
			for entry in &self.entries {
				if mem::replace(&mut seen[usize::from(entry.index)], true) {
					return Err(Error::DuplicateIndex(entry.index));
				}
			}
			Ok(())
		}

		/// Decode a PPAL. Bytes after the last declared entry are ignored and duplicate indices are
		/// let through, the same as files from our own writer.
		pub fn decode(bytes: &[u8]) -> Result<Self> {
			if bytes.get(..MAGIC.len()) != Some(&MAGIC[..]) {
				return Err(Error::Format);
			}
			let mut cursor = &bytes[MAGIC.len()..];
			let count = cursor
				.read_u32::<LE>()
				.map_err(|_| Error::Truncated { expected: HEADER_SIZE as _, available: bytes.len() })?;
			let expected = HEADER_SIZE as u64 + u64::from(count) * ENTRY_SIZE as u64;
			if (bytes.len() as u64) < expected {
				return Err(Error::Truncated { expected, available: bytes.len() });
			}
			let entries = bytes[HEADER_SIZE..expected as _]
				.chunks_exact(ENTRY_SIZE)
				.map(|entry| PaletteEntry { index: entry[0], r: entry[1], g: entry[2], b: entry[3] })
				.collect();
			Ok(Self { entries })
		}

		/// [`Ppal::decode`] followed by [`Ppal::validate`].
		pub fn decodeStrict(bytes: &[u8]) -> Result<Self> {
			let ppal = Self::decode(bytes)?;
			ppal.validate()?;
			Ok(ppal)
		}

		pub fn read<R: Read>(mut reader: R, strict: bool) -> Result<Self> {
			let mut bytes = Vec::new();
			reader.read_to_end(&mut bytes)?;
			if strict {
				Self::decodeStrict(&bytes)
			} else {
				Self::decode(&bytes)
			}
		}

		pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
			let count = u32::try_from(self.len())
				.map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "too many PPAL entries"))?;
			writer.write_all(&MAGIC)?;
			writer.write_u32::<LE>(count)?;
			for entry in &self.entries {
				writer.write_all(&entry.toBytes())?;
			}
			Ok(())
		}

		#[must_use]
		pub fn encode(&self) -> Vec<u8> {
			let mut bytes = Vec::with_capacity(self.encodedLen());
			bytes.extend_from_slice(&MAGIC);
			bytes.extend_from_slice(&(self.len() as u32).to_le_bytes());
			for entry in &self.entries {
				bytes.extend_from_slice(&entry.toBytes());
			}
			bytes
		}
	}

}

/// Paletted images, as far as PPAL tools care about them: a full 256-slot palette and one palette
/// index per pixel. Decoding and encoding go through [`image::PalettedImageCodec`], with indexed
/// PNG as the stock implementation.
pub mod image {
	use {
		crate::{
			error::{Error, Result},
			Palette, NUM_SLOTS, RGB_SIZE,
		},
		core::iter,
		png::{BitDepth, ColorType, Transformations},
		std::io::Write,
	};

	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct PalettedImage {
		pub width: u32,
		pub height: u32,
		pub palette: Palette,
		/// `width * height` palette indices, row by row.
		pub pixels: Vec<u8>,
		pub transparentIndex: Option<u8>,
	}

	impl PalettedImage {
		/// Palettes shorter than 256 colours are padded with black.
		#[must_use]
		pub fn paletteFromBytes(bytes: &[u8]) -> Palette {
			let mut palette = [[0; RGB_SIZE]; NUM_SLOTS];
			for (slot, rgb) in iter::zip(&mut palette, bytes.chunks_exact(RGB_SIZE)) {
				slot.copy_from_slice(rgb);
			}
			palette
		}

		#[must_use]
		pub fn paletteBytes(&self) -> Vec<u8> {
			self.palette.concat()
		}
	}

	pub trait PalettedImageCodec {
		/// Fails with [`Error::NotPaletted`] on anything that isn't indexed colour.
		fn decode(&self, bytes: &[u8]) -> Result<PalettedImage>;
		fn encode<W: Write>(&self, image: &PalettedImage, writer: W) -> Result<()>;
	}

	/// Indexed PNG.
	#[derive(Clone, Copy, Debug, Default)]
	pub struct Png;

	impl PalettedImageCodec for Png {
		fn decode(&self, bytes: &[u8]) -> Result<PalettedImage> {
			let mut decoder = png::Decoder::new(bytes);
			decoder.set_transformations(Transformations::IDENTITY);
			let png = &mut decoder.read_info()?;
			let (&png::Info { width, height, color_type, bit_depth, .. }, palette, transparentIndex) = {
				let info = png.info();
				(
					info,
					PalettedImage::paletteFromBytes(info.palette.as_deref().unwrap_or_default()),
					info.trns
						.as_deref()
						.and_then(|alphas| alphas.iter().position(|&alpha| alpha == 0))
						.and_then(|index| u8::try_from(index).ok()),
				)
			};
			if color_type != ColorType::Indexed {
				return Err(Error::NotPaletted);
			}
			let mut buffer = vec![0; png.output_buffer_size()];
			let frame = png.next_frame(&mut buffer)?;
			let pixels = unpackRows(&buffer[..frame.buffer_size()], frame.line_size, width as _, bit_depth);
			Ok(PalettedImage { width, height, palette, pixels, transparentIndex })
		}

		/// Always writes 8-bit indices and the whole palette. A transparent index becomes a `tRNS`
		/// chunk that is opaque up to that slot.
		fn encode<W: Write>(&self, image: &PalettedImage, writer: W) -> Result<()> {
			let mut png = png::Encoder::new(writer, image.width, image.height);
			png.set_color(ColorType::Indexed);
			png.set_depth(BitDepth::Eight);
			png.set_palette(image.paletteBytes());
			if let Some(transparentIndex) = image.transparentIndex {
				let mut alphas = vec![u8::MAX; usize::from(transparentIndex) + 1];
				alphas[usize::from(transparentIndex)] = 0;
				png.set_trns(alphas);
			}
			let mut png = png.write_header()?;
			png.write_image_data(&image.pixels)?;
			png.finish()?;
			Ok(())
		}
	}

	/// Low bit depths pack several indices per byte, most significant bits first, and every row
	/// starts on a fresh byte.
	fn unpackRows(data: &[u8], lineSize: usize, width: usize, bitDepth: BitDepth) -> Vec<u8> {
		let bits = bitDepth as usize;
		let (perByte, mask) = (8 / bits, u8::MAX >> (8 - bits));
		let mut pixels = Vec::with_capacity(width * (data.len() / lineSize.max(1)));
		for row in data.chunks(lineSize) {
			pixels.extend((0..width).map(|x| (row[x / perByte] >> (8 - bits * (x % perByte + 1))) & mask));
		}
		pixels
	}

	#[cfg(test)]
	mod tests {
		use {
			super::{unpackRows, PalettedImage, PalettedImageCodec, Png},
			crate::{Error, NUM_SLOTS},
			png::{BitDepth, ColorType},
		};

		fn sample() -> PalettedImage {
			let mut palette = [[0; 3]; NUM_SLOTS];
			for (i, rgb) in palette.iter_mut().enumerate() {
				*rgb = [i as u8, 255 - i as u8, (i * 7) as u8];
			}
			PalettedImage {
				width: 3,
				height: 2,
				palette,
				pixels: vec![0, 1, 2, 200, 254, 255],
				transparentIndex: Some(4),
			}
		}

		#[test]
		fn test_png_round_trip_works() {
			let image = sample();
			let mut buffer = Vec::new();
			Png.encode(&image, &mut buffer).unwrap();
			assert_eq!(Png.decode(&buffer).unwrap(), image);

			let opaque = PalettedImage { transparentIndex: None, ..sample() };
			buffer.clear();
			Png.encode(&opaque, &mut buffer).unwrap();
			assert_eq!(Png.decode(&buffer).unwrap(), opaque);
		}

		#[test]
		fn test_low_bit_depths_get_unpacked() {
			let mut buffer = Vec::new();
			{
				let mut png = png::Encoder::new(&mut buffer, 3, 2);
				png.set_color(ColorType::Indexed);
				png.set_depth(BitDepth::Four);
				png.set_palette(vec![10, 10, 10, 20, 20, 20, 30, 30, 30]);
				let mut png = png.write_header().unwrap();
				png.write_image_data(&[0x12, 0x00, 0x21, 0x00]).unwrap();
				png.finish().unwrap();
			}
			let image = Png.decode(&buffer).unwrap();
			assert_eq!(image.pixels, [1, 2, 0, 2, 1, 0]);
			assert_eq!(image.palette[2], [30, 30, 30]);
			assert_eq!(image.palette[3], [0, 0, 0]);
			assert_eq!(image.transparentIndex, None);
		}

		#[test]
		fn test_unpacking_one_bit_rows_works() {
			assert_eq!(unpackRows(&[0b1010_0000, 0b0110_0000], 1, 3, BitDepth::One), [1, 0, 1, 0, 1, 1]);
			assert_eq!(unpackRows(&[0b1110_0100], 1, 4, BitDepth::Two), [3, 2, 1, 0]);
			assert_eq!(unpackRows(&[7, 8, 9, 1, 2, 3], 3, 3, BitDepth::Eight), [7, 8, 9, 1, 2, 3]);
		}

		#[test]
		fn test_rgb_png_is_not_paletted() {
			let mut buffer = Vec::new();
			{
				let mut png = png::Encoder::new(&mut buffer, 1, 1);
				png.set_color(ColorType::Rgb);
				png.set_depth(BitDepth::Eight);
				let mut png = png.write_header().unwrap();
				png.write_image_data(&[1, 2, 3]).unwrap();
				png.finish().unwrap();
			}
			assert!(matches!(Png.decode(&buffer), Err(Error::NotPaletted)));
		}

		#[test]
		fn test_garbage_is_a_decoding_error() {
			assert!(matches!(Png.decode(b"PPAL\0\0\0\0"), Err(Error::Decoding(_))));
		}
	}
}

/// Common-palette extraction: the slots on which every palette of a set agrees.
pub mod extract {
	use {
		crate::{
			error::{Error, Result},
			image::PalettedImage,
			ppal::{PaletteEntry, Ppal},
			Palette, NUM_SLOTS,
		},
		core::iter,
	};

	const NEED_TWO: &str = "at least two palettes are needed to find common entries";

	/// The first palette supplies the colours; every later one only votes on whether a slot matches
	/// it exactly. Entries come out in ascending slot order.
	pub fn commonPalette<'a>(palettes: impl IntoIterator<Item = &'a Palette>) -> Result<Ppal> {
		let mut palettes = palettes.into_iter();
		let reference = palettes.next().ok_or(Error::InvalidInput(NEED_TWO))?;
		let (mut common, mut peers) = ([true; NUM_SLOTS], 0_usize);
		for palette in palettes {
			peers += 1;
			for (isCommon, (ours, theirs)) in iter::zip(&mut common, iter::zip(reference, palette)) {
				*isCommon &= ours == theirs;
			}
		}
		if peers == 0 {
			return Err(Error::InvalidInput(NEED_TWO));
		}
		Ok(Ppal::fromEntries(
			iter::zip(0..=u8::MAX, iter::zip(reference, common))
				.filter_map(|(index, (&rgb, isCommon))| isCommon.then_some(PaletteEntry::new(index, rgb)))
				.collect(),
		))
	}

	pub fn commonEntries(images: &[PalettedImage]) -> Result<Ppal> {
		commonPalette(images.iter().map(|image| &image.palette))
	}

}

/// Splicing a PPAL into an image.
///
/// The PPAL's entries keep their slots. The image's own leading colours move into the free run of
/// slots, and every pixel shifts along with them. Only PPALs whose fixed slots form at most two
/// contiguous blocks around a single free run are supported.
pub mod splice {
	use {
		crate::{
			error::{Error, Result},
			image::PalettedImage,
			ppal::Ppal,
			Rgb, NUM_SLOTS, RGB_SIZE,
		},
		core::iter,
	};

	#[must_use]
	pub fn fixedSlots(ppal: &Ppal) -> [Option<Rgb>; NUM_SLOTS] {
		let mut fixed = [None; NUM_SLOTS];
		for entry in ppal.entries() {
			fixed[usize::from(entry.index)] = Some(entry.rgb());
		}
		fixed
	}

	/// The first free slot and the length of the free run starting there.
	#[must_use]
	pub fn freeRun(fixed: &[Option<Rgb>; NUM_SLOTS]) -> Option<(usize, usize)> {
		let freeStart = fixed.iter().position(Option::is_none)?;
		Some((freeStart, fixed[freeStart..].iter().take_while(|slot| slot.is_none()).count()))
	}

	pub fn splice(ppal: &Ppal, image: &PalettedImage) -> Result<PalettedImage> {
		let freeCount = NUM_SLOTS.checked_sub(ppal.len()).filter(|&n| n > 0).ok_or(Error::NoFreeSpace)?;
		log::info!("retaining {freeCount} entries");
		let fixed = fixedSlots(ppal);
		let (freeStart, runLen) = freeRun(&fixed).ok_or(Error::NoFreeSpace)?;
		if runLen < freeCount {
			return Err(Error::FragmentedPalette { freeStart, runLen, freeCount });
		}

		let mut palette = [[0; RGB_SIZE]; NUM_SLOTS];
		for (slot, fixed) in iter::zip(&mut palette, &fixed) {
			if let Some(rgb) = fixed {
				*slot = *rgb;
			}
		}
		palette[freeStart..freeStart + freeCount].copy_from_slice(&image.palette[..freeCount]);

		let mut strays = 0_usize;
		let pixels = image
			.pixels
			.iter()
			.map(|&index| {
				if Some(index) == image.transparentIndex {
					return Ok(0);
				}
				if usize::from(index) >= freeCount {
					strays += 1;
				}
				u8::try_from(usize::from(index) + freeStart)
					.map_err(|_| Error::IndexOutOfRange { index, freeStart })
			})
			.collect::<Result<Vec<_>>>()?;
		if strays > 0 {
			log::warn!("{strays} pixels use slots past the {freeCount} retained colours");
		}

		Ok(PalettedImage {
			width: image.width,
			height: image.height,
			palette,
			pixels,
			transparentIndex: image.transparentIndex,
		})
	}

	#[cfg(test)]
	mod tests {
		use {
			super::{fixedSlots, freeRun, splice},
			crate::{
				image::PalettedImage,
				ppal::{PaletteEntry, Ppal},
				Error, NUM_SLOTS, RGB_SIZE,
			},
			core::ops::RangeInclusive,
		};

		const FIXED_RGB: [u8; RGB_SIZE] = [1, 2, 3];

		fn ppalOf(ranges: &[RangeInclusive<u8>]) -> Ppal {
			Ppal::fromEntries(
				ranges
					.iter()
					.flat_map(|range| range.clone().map(|index| PaletteEntry::new(index, FIXED_RGB)))
					.collect(),
			)
		}

		/// Own colours are `[i, i, 255]`, never equal to the fixed colour.
		fn imageWith(pixels: Vec<u8>, transparentIndex: Option<u8>) -> PalettedImage {
			let mut palette = [[0; RGB_SIZE]; NUM_SLOTS];
			for (i, rgb) in palette.iter_mut().enumerate() {
				*rgb = [i as u8, i as u8, 255];
			}
			PalettedImage { width: pixels.len() as _, height: 1, palette, pixels, transparentIndex }
		}

		#[test]
		fn test_full_ppal_has_no_free_space() {
			let image = imageWith(vec![0], None);
			assert!(matches!(splice(&ppalOf(&[0..=255]), &image), Err(Error::NoFreeSpace)));

			let mut entries = ppalOf(&[0..=254]).entries().to_vec();
			entries.push(PaletteEntry::new(0, FIXED_RGB));
			assert!(matches!(splice(&Ppal::fromEntries(entries), &image), Err(Error::NoFreeSpace)));
		}

		#[test]
		fn test_low_block_ppal_works() {
			let ppal = ppalOf(&[0..=199]);
			let image = imageWith(vec![0, 1, 7, 55, 9, 55], Some(7));
			let spliced = splice(&ppal, &image).unwrap();
			assert_eq!(spliced.pixels, [200, 201, 0, 255, 209, 255]);
			assert_eq!((spliced.width, spliced.height, spliced.transparentIndex), (6, 1, Some(7)));
			assert!(spliced.palette[..200].iter().all(|&rgb| rgb == FIXED_RGB));
			assert_eq!(&spliced.palette[200..], &image.palette[..56]);
		}

		#[test]
		fn test_gap_exactly_matching_free_count_works() {
			let ppal = ppalOf(&[0..=99, 150..=255]);
			assert_eq!(freeRun(&fixedSlots(&ppal)), Some((100, 50)));
			let spliced = splice(&ppal, &imageWith(vec![0, 49, 3], None)).unwrap();
			assert_eq!(spliced.pixels, [100, 149, 103]);
			assert_eq!(spliced.palette[100], [0, 0, 255]);
			assert_eq!(spliced.palette[149], [49, 49, 255]);
			assert_eq!(spliced.palette[99], FIXED_RGB);
			assert_eq!(spliced.palette[150], FIXED_RGB);
		}

		#[test]
		fn test_high_block_ppal_keeps_indices() {
			let ppal = ppalOf(&[56..=255]);
			let spliced = splice(&ppal, &imageWith(vec![0, 5, 55], Some(5))).unwrap();
			assert_eq!(spliced.pixels, [0, 0, 55]);
			assert_eq!(spliced.palette[55], [55, 55, 255]);
			assert_eq!(spliced.palette[56], FIXED_RGB);
		}

		#[test]
		fn test_interleaved_ppal_is_fragmented() {
			let ppal = ppalOf(&[0..=99, 120..=129, 150..=255]);
			assert!(matches!(
				splice(&ppal, &imageWith(vec![0], None)),
				Err(Error::FragmentedPalette { freeStart: 100, runLen: 20, freeCount: 40 })
			));
			let ppal = ppalOf(&[1..=1, 3..=255]);
			assert!(matches!(splice(&ppal, &imageWith(vec![0], None)), Err(Error::FragmentedPalette { .. })));
		}

		#[test]
		fn test_overflowing_pixel_is_an_error() {
			let ppal = ppalOf(&[0..=199]);
			assert!(matches!(
				splice(&ppal, &imageWith(vec![0, 56], None)),
				Err(Error::IndexOutOfRange { index: 56, freeStart: 200 })
			));
			assert!(splice(&ppal, &imageWith(vec![0, 56], Some(56))).is_ok());
		}
	}
}

/// Splicing one PPAL into many images, as described by a TOML manifest:
///
/// ```toml
/// ppal = "common.ppal"
/// strict = false
///
/// [[job]]
/// input = "sprites/a.png"
/// output = "out/a.png"
/// ```
///
/// Relative paths are taken relative to the manifest. A job that fails is skipped and the rest
/// carry on.
pub mod batch {
	use {
		crate::{
			error::{Error, Result},
			image::PalettedImageCodec,
			ppal::Ppal,
			splice::splice,
		},
		serde::Deserialize,
		std::{
			fs,
			path::{Path, PathBuf},
		},
	};

	#[derive(Debug, Deserialize)]
	#[serde(deny_unknown_fields)]
	pub struct Manifest {
		pub ppal: PathBuf,

		#[serde(default)]
		pub strict: bool,

		#[serde(rename = "job", default)]
		pub jobs: Vec<Job>,
	}

	#[derive(Debug, Deserialize)]
	#[serde(deny_unknown_fields)]
	pub struct Job {
		pub input: PathBuf,
		pub output: PathBuf,
	}

	impl Manifest {
		pub fn parse(text: &str) -> Result<Self> {
			Ok(toml::from_str(text)?)
		}

		pub fn load(path: &Path) -> Result<Self> {
			let mut manifest = Self::parse(&fs::read_to_string(path)?)?;
			if let Some(base) = path.parent() {
				manifest.resolveAgainst(base);
			}
			Ok(manifest)
		}

		pub fn resolveAgainst(&mut self, base: &Path) {
			let resolve = |path: &mut PathBuf| {
				if path.is_relative() {
					*path = base.join(&*path);
				}
			};
			resolve(&mut self.ppal);
			for Job { input, output } in &mut self.jobs {
				resolve(input);
				resolve(output);
			}
		}
	}

	#[derive(Debug, Default)]
	pub struct Report {
		pub spliced: Vec<PathBuf>,
		pub skipped: Vec<(PathBuf, Error)>,
	}

	pub fn spliceFile<C: PalettedImageCodec>(ppal: &Ppal, input: &Path, output: &Path, codec: &C) -> Result<()> {
		let image = codec.decode(&fs::read(input)?)?;
		let mut encoded = Vec::new();
		codec.encode(&splice(ppal, &image)?, &mut encoded)?;
		fs::write(output, encoded)?;
		Ok(())
	}

	/// Only a PPAL that can't be read fails the whole batch.
	pub fn run<C: PalettedImageCodec>(manifest: &Manifest, codec: &C) -> Result<Report> {
		let ppal = Ppal::read(fs::File::open(&manifest.ppal)?, manifest.strict)?;
		let mut report = Report::default();
		for Job { input, output } in &manifest.jobs {
			match spliceFile(&ppal, input, output, codec) {
				Ok(()) => {
					log::info!("{} -> {}", input.display(), output.display());
					report.spliced.push(input.clone());
				}
				Err(err) => {
					log::warn!("{}: {err} - Skipping.", input.display());
					report.skipped.push((input.clone(), err));
				}
			}
		}
		Ok(report)
	}

}

/// `RUST_LOG` overrides the default `info` filter. Everything goes to stderr.
pub fn initLogging() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.format_timestamp(None)
		.init();
}

use std::fs::File;

#[cfg(unix)]
#[must_use]
pub fn stdoutRaw() -> File {
	use std::os::unix::io::FromRawFd;
	unsafe { File::from_raw_fd(1) }
}

#[cfg(windows)]
#[must_use]
pub fn stdoutRaw() -> File {
	use std::{
		io,
		os::windows::io::{AsRawHandle, FromRawHandle},
	};
	unsafe { File::from_raw_handle(io::stdout().as_raw_handle()) }
}
