//! 测试辅助：手工拼一个最小可读的 .xlsx（xlsx 本质是一个 zip 包）。

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use zip::ZipWriter;
use zip::write::FileOptions;

pub(crate) enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Empty,
}

pub(crate) fn write_xlsx(path: &Path, sheet_name: &str, rows: &[Vec<Cell<'_>>]) {
    let file = File::create(path).expect("create xlsx");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{sheet_name}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
    );

    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

    let mut sheet_data = String::new();
    for (ri, row) in rows.iter().enumerate() {
        sheet_data.push_str(&format!("<row r=\"{}\">", ri + 1));
        for (ci, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", (b'A' + ci as u8) as char, ri + 1);
            match cell {
                Cell::Text(text) => sheet_data.push_str(&format!(
                    "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{text}</t></is></c>"
                )),
                Cell::Number(n) => {
                    sheet_data.push_str(&format!("<c r=\"{cell_ref}\"><v>{n}</v></c>"))
                }
                Cell::Empty => sheet_data.push_str(&format!("<c r=\"{cell_ref}\"/>")),
            }
        }
        sheet_data.push_str("</row>");
    }
    let worksheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>{sheet_data}</sheetData>
</worksheet>"#
    );

    let parts = [
        ("[Content_Types].xml", content_types.to_string()),
        ("_rels/.rels", root_rels.to_string()),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", workbook_rels.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).expect("start_file");
        zip.write_all(body.as_bytes()).expect("write part");
    }
    zip.finish().expect("finish xlsx");
}
