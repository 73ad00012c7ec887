extern crate argparse;
extern crate html2mailtext;
use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use html2mailtext::config;
use std::io;
use std::io::{Read, Write};

fn translate(html: &str, merge_cells: bool, ol_start: i64) -> html2mailtext::Result<String> {
    let rewriter = config::plain()
        .merge_empty_cells(merge_cells)
        .ordered_list_start(ol_start)
        .renderer();
    html2mailtext::PlainTextMiddleware::new(rewriter).html_to_text(html)
}

fn main() {
    env_logger::init();

    let mut infile: Option<String> = None;
    let mut outfile: Option<String> = None;
    let mut merge_cells: bool = false;
    let mut ol_start: i64 = 1;

    {
        let mut ap = ArgumentParser::new();
        ap.refer(&mut infile).add_argument(
            "infile",
            StoreOption,
            "Input HTML file (default is standard input)",
        );
        ap.refer(&mut outfile).add_option(
            &["-o", "--output"],
            StoreOption,
            "Output file (default is standard output)",
        );
        ap.refer(&mut merge_cells).add_option(
            &["-m", "--merge-cells"],
            StoreTrue,
            "Merge empty table cells into the cell before them",
        );
        ap.refer(&mut ol_start).add_option(
            &["--ol-start"],
            Store,
            "First number of ordered lists (default is 1)",
        );
        ap.parse_args_or_exit();
    }

    let mut html = String::new();
    match infile {
        None => {
            io::stdin()
                .lock()
                .read_to_string(&mut html)
                .expect("Tried to read standard input");
        }
        Some(name) => {
            let mut file = std::fs::File::open(name).expect("Tried to open file");
            file.read_to_string(&mut html).expect("Tried to read file");
        }
    };

    let data = match translate(&html, merge_cells, ol_start) {
        Ok(data) => data,
        Err(e) => {
            log::error!("Failed to convert: {}", e);
            std::process::exit(1);
        }
    };

    match outfile {
        None => {
            println!("{}", data);
        }
        Some(name) => {
            let mut file = std::fs::File::create(name).expect("Tried to create file");
            write!(file, "{}", data).unwrap();
        }
    };
}
