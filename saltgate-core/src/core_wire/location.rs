//! Location message body grammar
//!
//! Line-oriented ASCII: `lat,lng,accuracy` with six decimal places, then an
//! optional POI name line, then an optional POI address line. Literal
//! newlines inside the address are escaped as the two characters `\n` so
//! the body never exceeds three lines.

use super::error::WireError;

#[derive(Debug, Clone, PartialEq)]
pub struct LocationMessage {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters; zero when the sender did not report one.
    pub accuracy: f64,
    pub poi_name: Option<String>,
    pub poi_address: Option<String>,
}

impl LocationMessage {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        LocationMessage {
            latitude,
            longitude,
            accuracy: 0.0,
            poi_name: None,
            poi_address: None,
        }
    }

    pub fn encode_body(&self) -> Result<Vec<u8>, WireError> {
        let mut body = format!(
            "{:.6},{:.6},{:.6}",
            self.latitude, self.longitude, self.accuracy
        );
        match (&self.poi_name, &self.poi_address) {
            (Some(name), address) => {
                body.push('\n');
                body.push_str(name);
                if let Some(address) = address {
                    body.push('\n');
                    body.push_str(&address.replace('\n', "\\n"));
                }
            }
            // an address line is only unambiguous after a name line; the
            // second line of the body always decodes as the POI name
            (None, Some(_)) => {
                return Err(WireError::InvalidArgument(
                    "location POI address requires a POI name".to_string(),
                ));
            }
            (None, None) => {}
        }
        Ok(body.into_bytes())
    }

    pub fn decode_body(bytes: &[u8]) -> Result<Self, WireError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| WireError::Malformed("location body is not UTF-8".to_string()))?;

        let mut lines = text.splitn(3, '\n');
        let coords = lines
            .next()
            .ok_or_else(|| WireError::Malformed("empty location body".to_string()))?;

        let parts: Vec<&str> = coords.split(',').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(WireError::Malformed(format!(
                "location needs 2 or 3 coordinates, got {}",
                parts.len()
            )));
        }
        let mut values = [0.0f64; 3];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part.parse().map_err(|_| {
                WireError::Malformed(format!("invalid coordinate value: {:?}", part))
            })?;
        }

        let poi_name = lines.next().map(str::to_string);
        let poi_address = lines.next().map(|s| s.replace("\\n", "\n"));

        Ok(LocationMessage {
            latitude: values[0],
            longitude: values[1],
            accuracy: values[2],
            poi_name,
            poi_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_coordinates() {
        let loc = LocationMessage::new(47.376888, 8.541694);
        let body = loc.encode_body().unwrap();
        assert_eq!(body, b"47.376888,8.541694,0.000000");
        assert_eq!(LocationMessage::decode_body(&body).unwrap(), loc);
    }

    #[test]
    fn test_poi_name_and_address() {
        let loc = LocationMessage {
            latitude: -33.868820,
            longitude: 151.209290,
            accuracy: 10.5,
            poi_name: Some("Sydney Opera House".to_string()),
            poi_address: Some("Bennelong Point\nSydney NSW".to_string()),
        };
        let body = loc.encode_body().unwrap();
        let text = String::from_utf8(body.clone()).unwrap();
        // escaped address keeps the body at three lines
        assert_eq!(text.matches('\n').count(), 2);
        assert!(text.contains("Bennelong Point\\nSydney NSW"));
        assert_eq!(LocationMessage::decode_body(&body).unwrap(), loc);
    }

    #[test]
    fn test_address_without_name_rejected() {
        let loc = LocationMessage {
            latitude: 1.0,
            longitude: 2.0,
            accuracy: 0.0,
            poi_name: None,
            poi_address: Some("Main St 1".to_string()),
        };
        assert!(matches!(
            loc.encode_body(),
            Err(WireError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_two_coordinate_form_accepted() {
        let loc = LocationMessage::decode_body(b"1.5,-2.5").unwrap();
        assert_eq!(loc.latitude, 1.5);
        assert_eq!(loc.longitude, -2.5);
        assert_eq!(loc.accuracy, 0.0);
    }

    #[test]
    fn test_bad_bodies_rejected() {
        assert!(LocationMessage::decode_body(b"1.5").is_err());
        assert!(LocationMessage::decode_body(b"1.5,2.5,3.5,4.5").is_err());
        assert!(LocationMessage::decode_body(b"abc,def").is_err());
        assert!(LocationMessage::decode_body(&[0xff, 0xfe]).is_err());
    }
}
