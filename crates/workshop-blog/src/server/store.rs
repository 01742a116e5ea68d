//! Document mapping between the protobuf `Blog` message and the MongoDB
//! collection.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use workshop_core::blog::Blog;
use workshop_core::Error;

/// Shape of a blog post as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

impl BlogDocument {
    /// Builds an unsaved document from client-supplied fields. Any id in the
    /// request is ignored; the store assigns one on insert.
    pub fn from_request(blog: Blog) -> Self {
        Self {
            id: None,
            author_id: blog.author_id,
            title: blog.title,
            content: blog.content,
        }
    }
}

impl From<BlogDocument> for Blog {
    fn from(doc: BlogDocument) -> Self {
        Blog {
            id: doc.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            author_id: doc.author_id,
            title: doc.title,
            content: doc.content,
        }
    }
}

/// Parses a client-supplied hex id.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when the id is not a valid 24-char hex
/// ObjectId.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, Error> {
    ObjectId::parse_str(raw).map_err(|_| Error::InvalidArgument {
        reason: format!("cannot parse blog id {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_field_to_the_proto_message() {
        let oid = ObjectId::new();
        let doc = BlogDocument {
            id: Some(oid),
            author_id: "ada".to_string(),
            title: "On Engines".to_string(),
            content: "Analytical notes".to_string(),
        };

        let blog = Blog::from(doc);
        assert_eq!(blog.id, oid.to_hex());
        assert_eq!(blog.author_id, "ada");
        assert_eq!(blog.title, "On Engines");
        assert_eq!(blog.content, "Analytical notes");
    }

    #[test]
    fn from_request_drops_any_client_supplied_id() {
        let doc = BlogDocument::from_request(Blog {
            id: "ffffffffffffffffffffffff".to_string(),
            author_id: "ada".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
        });

        assert!(doc.id.is_none());
    }

    #[test]
    fn parses_a_valid_hex_id() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn rejects_a_malformed_id() {
        let result = parse_object_id("not-an-object-id");
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }
}
