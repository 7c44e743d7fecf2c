use olelib::OleFile;
use std::env;
use std::path::PathBuf;
use std::process;

const BYTES_PER_LINE: usize = 16;

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!(" ------------------------------------------");
    println!("|  OLE2 Structured Storage Utility | v{version} |");
    println!(" ------------------------------------------");
    println!("\nUsage:");
    println!("  olecli info <input>");
    println!("  olecli ls <input>");
    println!("  olecli dump <input> <stream> [options]");
    println!("\nOptions:");
    println!("  --text    Print the stream as text ('.' for non-printable bytes)");
    println!("\nExamples:");
    println!("  olecli info report.doc");
    println!("  olecli ls report.doc");
    println!("  olecli dump report.doc WordDocument");
    println!("  olecli dump mail.msg __substg1.0_0037001F --text");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    // Dispatch and immediately handle results
    if let Err(e) = run_dispatch(command, &args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(cmd: &str, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        "info" => {
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let abs_path = validate_ole(path_str)?;
            run_info(&abs_path)
        }
        "ls" => {
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let abs_path = validate_ole(path_str)?;
            run_ls(&abs_path)
        }
        "dump" => {
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let stream = args.get(3).ok_or("Missing stream path")?;
            if stream.starts_with("--") {
                return Err("Missing stream path".into());
            }
            let abs_path = validate_ole(path_str)?;
            let as_text = args.iter().skip(4).any(|arg| arg == "--text");
            run_dump(&abs_path, stream, as_text)
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn run_info(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let ole = OleFile::open(path)?;

    println!("File Path:    {}", path.display());
    println!("File Size:    {} bytes", ole.file_size());
    println!(
        "Format:       v{} ({} byte sectors)",
        ole.major_version(),
        ole.sector_size()
    );
    println!("Streams:      {}", ole.list_streams().len());
    println!(
        "Root CLSID:   {}",
        ole.root_clsid().unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}

fn run_ls(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let ole = OleFile::open(path)?;

    for stream in ole.list_streams() {
        let parts: Vec<&str> = stream.iter().map(String::as_str).collect();
        let size = ole.stream_size(&parts).unwrap_or(0);
        println!("{size:>10}  {}", printable_name(&stream.join("/")));
    }
    Ok(())
}

fn run_dump(path: &PathBuf, stream: &str, as_text: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut ole = OleFile::open(path)?;
    let parts: Vec<&str> = stream.split('/').filter(|p| !p.is_empty()).collect();
    let data = ole.read_stream(&parts)?;

    if as_text {
        println!("{}", text_form(&data));
    } else {
        for line in dump_lines(&data) {
            println!("{line}");
        }
    }
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Validate that a path exists, is a file and looks like a compound file. Returns absolute path.
fn validate_ole(path_str: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = PathBuf::from(path_str);
    if !path.exists() {
        return Err(format!("File not found: {path_str}").into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {path_str}").into());
    }
    if !OleFile::is_ole_file(&path) {
        return Err(format!("'{path_str}' is not an OLE2 structured storage file").into());
    }
    Ok(std::fs::canonicalize(path)?)
}

const fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic() || byte == b' '
}

/// Property set streams start with control characters, show them as `\x05`
fn printable_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() {
                format!("\\x{:02X}", u32::from(c))
            } else {
                c.to_string()
            }
        })
        .collect()
}

fn text_form(data: &[u8]) -> String {
    data.iter()
        .map(|&b| if is_printable(b) { char::from(b) } else { '.' })
        .collect()
}

/// Address (`0000h`), sixteen hex pairs and the ASCII column, like the viewer
fn dump_lines(data: &[u8]) -> Vec<String> {
    let line_count = data.len().div_ceil(BYTES_PER_LINE);
    let digits = format!("{:X}", line_count * BYTES_PER_LINE).len().max(4);

    data.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| {
            let hex = chunk
                .iter()
                .map(|b| format!("{b:02X}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "{:0digits$X}h {hex:<width$}  {}",
                i * BYTES_PER_LINE,
                text_form(chunk),
                width = BYTES_PER_LINE * 3 - 1
            )
        })
        .collect()
}
