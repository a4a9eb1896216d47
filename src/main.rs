use clap::{arg,crate_version,Command};
use std::fs::File;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::init();

    let long_help =
"Examples:
---------
Compress:      `huffzip compress -i my_file -o my_file.huff`
Expand:        `huffzip expand -i my_file.huff -o my_file`";

    let mut main_cmd = Command::new("huffzip")
        .about("Compress and expand with static Huffman coding")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("compress")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("compress a file"));
    main_cmd = main_cmd.subcommand(Command::new("expand")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("expand a file"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        run(path_in, path_out, huffzip::codec::compress)?;
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        run(path_in, path_out, huffzip::codec::decompress)?;
    }

    Ok(())
}

/// Run `op` over `path_in`/`path_out`, deleting a partial output file if `op` fails.
fn run<F>(path_in: &str, path_out: &str, op: F) -> Result<(),Box<dyn std::error::Error>>
where F: Fn(&mut File, &mut File) -> Result<(u64,u64),huffzip::Error>
{
    let mut input = File::open(path_in)?;
    let mut output = File::create(path_out)?;
    match op(&mut input, &mut output) {
        Ok((bytes_read,bytes_written)) => {
            log::debug!("read {} bytes, wrote {} bytes", bytes_read, bytes_written);
            Ok(())
        }
        Err(e) => {
            drop(output);
            let _ = std::fs::remove_file(path_out);
            Err(Box::new(e))
        }
    }
}
