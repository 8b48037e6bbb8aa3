use trupng::png::{scan_chunks, DecodeOptions, PngDecoder};

fn main() {
  let args: Vec<String> = std::env::args().collect();
  let decoder = PngDecoder::with_options(DecodeOptions::new().with_max_pixel_bytes(1 << 30));
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    let bytes = match std::fs::read(path) {
      Ok(bytes) => bytes,
      Err(e) => {
        println!("{}: {e}", path.display());
        continue;
      }
    };
    match scan_chunks(&bytes) {
      Ok((header, stream)) => println!(
        "{}: {}x{} {:?}, {} bytes of zlib over {} IDAT chunks",
        path.display(),
        header.width,
        header.height,
        header.color_type,
        stream.len(),
        stream.chunk_count()
      ),
      Err(e) => {
        println!("{}: {e}", path.display());
        continue;
      }
    }
    match decoder.decode(&bytes) {
      Ok(image) => {
        let first = image.pixel(0, 0);
        println!("  decoded {} pixel bytes, top left: {first:?}", image.pixels().len());
      }
      Err(e) => println!("  decode failed: {e}"),
    }
  }
  if args.len() == 1 {
    println!("usage: png_info FILE...");
  }
}
