//! `multipart/form-data` encoding.
//!
//! The body is encoded here rather than by the HTTP library because the
//! upload signature covers the exact `Content-Type` value, boundary included.
//! The boundary has to be known before signing and has to be the one on the
//! wire.

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Payload of a single part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartData {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub data: PartData,
}

/// An ordered multipart form with a fixed boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self { boundary: boundary.into(), parts: Vec::new() }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value of the `Content-Type` request header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a binary part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            data: PartData::File {
                file_name: file_name.into(),
                content_type: content_type.into(),
                bytes,
            },
        });
        self
    }

    /// Append a plain text part.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part { name: name.into(), data: PartData::Text(value.into()) });
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Names of all parts, in wire order.
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }

    /// Value of the first text part called `name`.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.data {
            PartData::Text(value) if p.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Serialize the form body.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();

        for part in &self.parts {
            body.extend_from_slice(b"--");
            body.extend_from_slice(self.boundary.as_bytes());
            body.extend_from_slice(b"\r\n");

            match &part.data {
                PartData::Text(value) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_quoted(&part.name)
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                PartData::File { file_name, content_type, bytes } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {}\r\n\r\n",
                            escape_quoted(&part.name),
                            escape_quoted(file_name),
                            content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }

            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(b"--");
        body.extend_from_slice(self.boundary.as_bytes());
        body.extend_from_slice(b"--\r\n");
        body
    }
}

/// Keep quoted header parameters on one line and inside their quotes.
fn escape_quoted(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}
