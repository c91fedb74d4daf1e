use serde::{self, Deserializer};

pub fn u32_from_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("u32 or string containing a u32")
        }

        fn visit_u64<E>(self, v: u64) -> Result<u32, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_str<E>(self, v: &str) -> Result<u32, E>
        where
            E: serde::de::Error,
        {
            v.parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(Visitor)
}

/// Django echoes back whatever was posted, which is a string, but an id
/// rendered from a model primary key can also come back as a number.
pub fn string_from_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("string or unsigned integer")
        }

        fn visit_u64<E>(self, v: u64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_str<E>(self, v: &str) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_owned())
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Echo {
        #[serde(deserialize_with = "string_from_number")]
        id: String,
        #[serde(deserialize_with = "u32_from_string")]
        count: u32,
    }

    #[test]
    fn should_accept_strings_and_numbers() {
        let echo: Echo = serde_json::from_str(r#"{"id": 42, "count": "5"}"#).unwrap();
        assert_eq!("42", echo.id);
        assert_eq!(5, echo.count);

        let echo: Echo = serde_json::from_str(r#"{"id": "42", "count": 5}"#).unwrap();
        assert_eq!("42", echo.id);
        assert_eq!(5, echo.count);
    }

    #[test]
    fn should_reject_negative_count() {
        assert!(serde_json::from_str::<Echo>(r#"{"id": "1", "count": -1}"#).is_err());
    }
}
