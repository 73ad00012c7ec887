#![feature(test)]
extern crate html2mailtext;
extern crate test;

use ::test::Bencher;

use html2mailtext::from_read;

fn make_html(content: &str) -> String {
    String::from("<html>") + content + "</html>"
}

fn make_tab(cell: &str, rows: usize, cols: usize) -> String {
    let mut result = String::from("<table>");
    for _ in 0..rows {
        result.push_str("<tr>");
        for _ in 0..cols {
            result.push_str("<td>");
            result.push_str(cell);
            result.push_str("</td>");
        }
        result.push_str("</tr>");
    }
    result.push_str("</table>");
    result
}

fn make_list(item: &str, items: usize) -> String {
    let mut result = String::from("<ul>");
    for _ in 0..items {
        result.push_str("<li>");
        result.push_str(item);
        result.push_str("</li>");
    }
    result.push_str("</ul>");
    result
}

#[bench]
fn bench_empty(b: &mut Bencher) {
    b.iter(|| from_read(make_html("").as_bytes()));
}

#[bench]
fn bench_tab_1_1(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 1, 1)).as_bytes()));
}
#[bench]
fn bench_tab_2_2(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 2, 2)).as_bytes()));
}
#[bench]
fn bench_tab_4_4(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 4, 4)).as_bytes()));
}
#[bench]
fn bench_tab_8_8(b: &mut Bencher) {
    b.iter(|| from_read(make_html(&make_tab("cell", 8, 8)).as_bytes()));
}

// Try a table with `depth` nested tables each with `rows` rows and `cols` columns.
fn bench_tab_depth(b: &mut Bencher, content: &str, depth: usize, rows: usize, cols: usize) {
    let mut t = String::from(content);
    for _ in 0..depth {
        t = make_tab(&t, rows, cols);
    }
    let html = make_html(&t);
    b.iter(|| from_read(html.as_bytes()));
}

#[bench]
fn bench_tab_2_1_depth_2(b: &mut Bencher) {
    bench_tab_depth(b, "cell", 2, 2, 1);
}
#[bench]
fn bench_tab_3_3_depth_2(b: &mut Bencher) {
    bench_tab_depth(b, "cell", 2, 3, 3);
}
#[bench]
fn bench_tab_2_2_depth_4(b: &mut Bencher) {
    bench_tab_depth(b, "cell", 4, 2, 2);
}

#[bench]
fn bench_list_in_table(b: &mut Bencher) {
    let html = make_html(&make_tab(&make_list("item", 5), 3, 3));
    b.iter(|| from_read(html.as_bytes()));
}

// A table with a header, a footer and `rows` body rows, every other one
// spanning the full width.
fn make_sectioned_tab(rows: usize, cols: usize) -> String {
    let mut result = String::from("<table><thead><tr>");
    for i in 0..cols {
        result.push_str(&format!("<th>head {}</th>", i));
    }
    result.push_str("</tr></thead><tbody>");
    for i in 0..rows {
        if i % 2 == 0 {
            result.push_str(&format!("<tr><td colspan=\"{}\">spanning row</td></tr>", cols));
        } else {
            result.push_str("<tr><td colspan=\"0\">rest</td></tr>");
        }
    }
    result.push_str("</tbody><tfoot><tr><td>total</td></tr></tfoot></table>");
    result
}

#[bench]
fn bench_tab_sections_8_4(b: &mut Bencher) {
    let html = make_html(&make_sectioned_tab(8, 4));
    b.iter(|| from_read(html.as_bytes()));
}

#[bench]
fn bench_nested_list_depth_4(b: &mut Bencher) {
    let mut list = String::from("item");
    for _ in 0..4 {
        list = make_list(&format!("item{}", list), 3);
    }
    let html = make_html(&list);
    b.iter(|| from_read(html.as_bytes()));
}
