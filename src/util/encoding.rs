use anyhow::{Context, Result, anyhow};
use encoding::DecoderTrap;
use encoding::label::encoding_from_whatwg_label;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read input text of unknown charset into a UTF-8 string.
///
/// Undecodable bytes are dropped.
pub fn decode_to_utf8<R>(input: &mut R) -> Result<String>
where
    R: std::io::Read,
{
    let mut buf: Vec<u8> = Vec::new();
    input
        .read_to_end(&mut buf)
        .context("Could not read input text")?;

    decode_bytes_to_utf8(&buf)
}

pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file =
        std::fs::File::open(path).with_context(|| format!("Could not open {:?}", path))?;
    decode_to_utf8(&mut file)
}

pub fn decode_bytes_to_utf8(input: &[u8]) -> Result<String> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    // most input is already utf-8; chardet is unreliable on short arabic text
    if let Ok(text) = std::str::from_utf8(input) {
        return Ok(text.to_string());
    }

    // (charset, confidence, language)
    let detected = chardet::detect(input);
    tracing::debug!(
        "detected charset {} (confidence {:.2})",
        detected.0,
        detected.1
    );

    let coder = encoding_from_whatwg_label(chardet::charset2encoding(&detected.0));
    match coder {
        Some(c) => c
            .decode(input, DecoderTrap::Ignore)
            .map_err(|e| anyhow!("decode error: {:?}", e)),
        None => Err(anyhow!("cannot find character encodings: {:?}", &detected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_utf8_passthrough() {
        let text = "النص العربي\n\nsecond paragraph";
        assert_eq!(decode_bytes_to_utf8(text.as_bytes()).unwrap(), text);

        let mut with_bom = UTF8_BOM.to_vec();
        with_bom.extend_from_slice("مرحبا".as_bytes());
        assert_eq!(decode_bytes_to_utf8(&with_bom).unwrap(), "مرحبا");
    }

    #[test]
    fn test_latin1_input() {
        // "café" in iso-8859-1 is not valid utf-8
        let sentence = b"Le caf\xe9 est tr\xe8s chaud et la cr\xe8me est d\xe9licieuse. ";
        let input = sentence.repeat(20);
        assert!(std::str::from_utf8(&input).is_err());

        let decoded = decode_bytes_to_utf8(&input).unwrap();
        assert!(decoded.contains("Le caf"));
        assert!(decoded.contains(" est "));
    }

    #[test]
    fn test_read_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\n\nsecond").unwrap();
        file.flush().unwrap();

        let text = read_text_file(file.path()).unwrap();
        assert_eq!(text, "first\n\nsecond");

        assert!(read_text_file(file.path().with_extension("missing")).is_err());
    }
}
