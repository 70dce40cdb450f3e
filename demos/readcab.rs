use std::env;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let num_args = env::args().count();
    if num_args != 2 {
        println!("Usage: readcab <path/to/archive.cab>");
        return Ok(());
    }

    let input_path = env::args().nth(1).context("Missing cabinet path")?;
    let mut decompressor: mscab::CabDecompressor =
        mscab::CabDecompressor::new();
    let cabinet = decompressor
        .open(&input_path)
        .context("Failed to open cabinet file")?;
    println!(
        "Cabinet {}.{}, set 0x{:04x} #{}, {} bytes",
        cabinet.version().0,
        cabinet.version().1,
        cabinet.cabinet_set_id(),
        cabinet.cabinet_set_index(),
        cabinet.length()
    );
    for folder in cabinet.folder_entries() {
        println!("Folder #{}:", folder.index());
        println!("  compression_type = {:?}", folder.compression_type());
        println!("  num_data_blocks = {}", folder.num_data_blocks());
        println!("  data_offset = {}", folder.data_offset());
        let mut total_size = 0;
        for file in folder.file_entries(cabinet.files()) {
            let size = file.uncompressed_size();
            println!("  {:?} ({} bytes)", file.name(), size);
            total_size += size;
        }
        println!("  {} bytes total", total_size);
    }

    let mut total_extracted = 0;
    for file in cabinet.file_entries() {
        match decompressor.extract(file) {
            Ok(data) => total_extracted += data.len(),
            Err(error) => println!("{:?}: {}", file.name(), error),
        }
    }
    println!("Extracted {} bytes", total_extracted);

    Ok(())
}
