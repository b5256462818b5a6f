use super::{structured, DecodeError, EncodeError, EncodeOptions, Parser};
use crate::value::Value;

/// HCL documents (`.hcl`)
///
/// Attributes become mapping entries, blocks become nested mappings keyed by their
/// identifier and labels. Template interpolations (`${...}`) are not evaluated and survive as text.
/// Encoding ignores [EncodeOptions], hcl-rs decides the layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct HclParser;

impl Parser for HclParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["hcl"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let text = std::str::from_utf8(bytes)?;
        let value: hcl::Value = hcl::from_str(text)?;
        structured(value.into())
    }

    fn encode(&self, tree: &Value, _options: &EncodeOptions) -> Result<String, EncodeError> {
        Ok(hcl::to_string(tree)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attributes_and_blocks() {
        let value = HclParser
            .decode(
                br#"
                name = "{{'person.name'}}"
                person {
                  name = "Antonio Carlos"
                  age = 42
                }
                "#,
            )
            .expect("must decode");

        assert_eq!(
            value.get_path("name"),
            Some(&Value::from("{{'person.name'}}"))
        );
        assert_eq!(
            value.get_path("person.name"),
            Some(&Value::from("Antonio Carlos"))
        );
        assert_eq!(value.get_path("person.age"), Some(&Value::Integer(42)));
    }

    #[test]
    fn invalid_syntax() {
        let err = HclParser.decode(b"not = valid = hcl").expect_err("must fail");
        assert!(matches!(err, DecodeError::Hcl(_)));
    }

    #[test]
    fn encoded_documents_decode_again() {
        let value: Value = [("name", Value::from("Benoit")), ("port", Value::Integer(80))]
            .into_iter()
            .collect();

        let encoded = HclParser
            .encode(&value, &EncodeOptions::default())
            .expect("must encode");
        assert_eq!(HclParser.decode(encoded.as_bytes()).unwrap(), value);
    }
}
