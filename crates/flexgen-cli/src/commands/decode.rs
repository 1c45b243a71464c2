//! `flexgen decode`: show how a single marker decodes.

use flexgen_engine::{decode, Command, DecodeError};

pub fn execute(marker: &str) -> anyhow::Result<()> {
    match decode_to_json(marker) {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn decode_to_json(marker: &str) -> Result<String, DecodeError> {
    let command: Command = decode(marker)?;
    // Serializing a Command cannot fail: it only holds strings
    Ok(serde_json::to_string_pretty(&command).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_marker_json() {
        let json = decode_to_json("{gen};{attr};reflectable;x").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["command"], "attribute");
        assert_eq!(value["payload"], serde_json::json!(["reflectable", "x"]));
    }

    #[test]
    fn test_funccall_marker_json() {
        let json = decode_to_json("{gen};{funccall}; make_reflect ").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["command"], "function_call");
        assert_eq!(value["payload"], "make_reflect");
    }

    #[test]
    fn test_not_a_marker() {
        assert_eq!(
            decode_to_json("hello").unwrap_err(),
            DecodeError::NotAGenMarker
        );
    }
}
