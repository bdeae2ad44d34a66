use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::record::StaffRecord;

/// Serialize records as a JSON array. Non-ASCII text is written as-is.
pub fn write_records<W: Write>(mut writer: W, records: &[StaffRecord], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, records)?;
    } else {
        serde_json::to_writer(&mut writer, records)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_file(path: &Path, records: &[StaffRecord], pretty: bool) -> Result<()> {
    let file = File::create(path)?;
    write_records(BufWriter::new(file), records, pretty)?;
    info!("Written {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    fn records() -> Vec<StaffRecord> {
        vec![
            StaffRecord {
                last_name: "Иванов".into(),
                first_name: "Иван".into(),
                middle_name: "Иванович".into(),
                img: "http://www.bseu.by/photo/ivanov.jpg".into(),
                degree: 2,
            },
            StaffRecord {
                last_name: "Петрова".into(),
                first_name: "Анна".into(),
                middle_name: String::new(),
                img: "https://mytimetable.live/images/man-user.png".into(),
                degree: 5,
            },
        ]
    }

    fn render(pretty: bool) -> String {
        let mut buf = Vec::new();
        write_records(&mut buf, &records(), pretty).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn compact_has_no_whitespace_and_keeps_cyrillic() {
        let json = render(false);
        assert!(json.starts_with(r#"[{"last_name":"Иванов","first_name":"Иван","middle_name":"Иванович","img":"#));
        assert!(!json.contains('\n'));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn pretty_indents_by_two() {
        let json = render(true);
        assert!(json.starts_with("[\n  {\n    \"last_name\": \"Иванов\",\n"));
        assert!(json.contains("    \"degree\": 5\n  }\n]"));
    }

    #[test]
    fn round_trip_preserves_records_and_order() {
        for pretty in [false, true] {
            let back: Vec<StaffRecord> = serde_json::from_str(&render(pretty)).unwrap();
            assert_eq!(back, records());
        }
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!("bseu_staff_{}.json", std::process::id()));
        write_file(&path, &records(), false).unwrap();
        let back: Vec<StaffRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn unwritable_path_keeps_io_cause() {
        let path = std::env::temp_dir().join("bseu_staff_no_such_dir").join("out.json");
        let err = write_file(&path, &records(), false).unwrap_err();
        match &err {
            ScrapeError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected {:?}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
    }
}
