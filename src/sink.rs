use std::io::{self, Write};

/// Receives everything the parser extracts. The driver calls `glyph` once
/// per glyph and `kern` once per kerning pair during the metrics phase,
/// then `feature` once per line during the feature phase. Calls arrive
/// synchronously on the caller's stack.
pub trait Sink {
    /// One glyph record. `index` is reserved by the downstream record
    /// format and always -1 here; `code` is 0 for unmapped glyphs; `width`
    /// and `bbox` are in 1/1000 em.
    fn glyph(&mut self, name: &str, index: i32, code: i32, width: i32, bbox: [i32; 4]);

    /// One horizontal kerning pair, value in 1/1000 em.
    fn kern(&mut self, left: &str, right: &str, value: i32);

    /// One `gsub`/`gpos`/`gcur` feature line, without the newline.
    fn feature(&mut self, line: &str);
}

/// Writes records as plain text lines, one per call.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, line: core::fmt::Arguments<'_>) {
        if let Err(error) = self.out.write_fmt(line).and_then(|()| writeln!(self.out)) {
            if error.kind() != io::ErrorKind::BrokenPipe {
                log::error!("write failed: {}", error);
            }
        }
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn glyph(&mut self, name: &str, index: i32, code: i32, width: i32, bbox: [i32; 4]) {
        self.write_line(format_args!(
            "char {} {} {} {} {} {} {} {}",
            name, index, code, width, bbox[0], bbox[1], bbox[2], bbox[3]
        ));
    }

    fn kern(&mut self, left: &str, right: &str, value: i32) {
        self.write_line(format_args!("kern {} {} {}", left, right, value));
    }

    fn feature(&mut self, line: &str) {
        self.write_line(format_args!("{}", line));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Sink, TextSink};

    /// Captures everything for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub glyphs: Vec<(String, i32, i32, i32, [i32; 4])>,
        pub kerns: Vec<(String, String, i32)>,
        pub features: Vec<String>,
    }

    impl Sink for RecordingSink {
        fn glyph(&mut self, name: &str, index: i32, code: i32, width: i32, bbox: [i32; 4]) {
            self.glyphs.push((name.to_owned(), index, code, width, bbox));
        }

        fn kern(&mut self, left: &str, right: &str, value: i32) {
            self.kerns.push((left.to_owned(), right.to_owned(), value));
        }

        fn feature(&mut self, line: &str) {
            self.features.push(line.to_owned());
        }
    }

    #[test]
    fn test_text_sink_lines() {
        let mut buffer = Vec::new();
        {
            let mut sink = TextSink::new(&mut buffer);
            sink.glyph("A", -1, 65, 722, [10, 0, 712, 716]);
            sink.kern("A", "V", -80);
            sink.feature("gsub liga 3 -f -i +fi");
        }
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "char A -1 65 722 10 0 712 716\nkern A V -80\ngsub liga 3 -f -i +fi\n"
        );
    }
}
