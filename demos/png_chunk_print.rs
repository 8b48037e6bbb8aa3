use trupng::png::RawChunkIter;

fn main() {
  let args: Vec<String> = std::env::args().collect();
  println!("ARGS: {args:?}");
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e:?}");
        continue;
      }
    };
    let chunks = match RawChunkIter::from_png_bytes(&bytes) {
      Ok(chunks) => chunks,
      Err(e) => {
        println!("{e}");
        continue;
      }
    };
    for (n, chunk_res) in chunks.enumerate() {
      match chunk_res {
        Ok(chunk) => {
          let crc = match chunk.verify_crc() {
            Ok(()) => "crc ok",
            Err(_) => "CRC MISMATCH",
          };
          println!("{n}: {:?} ({} bytes, {crc})", chunk.chunk_type, chunk.data.len());
        }
        Err(e) => println!("{n}: {e}"),
      }
    }
  }
}
