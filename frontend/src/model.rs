use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Snapshot returned by `GET /api/binder/{name}/data`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BinderData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "categories_in_order")]
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "category_name")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` when the server sent something other than a number.
    #[serde(default, deserialize_with = "number_or_none")]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    /// Key of the entry in the `categories` object.
    pub key: String,
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Category {
    /// Text shown for the category: its `name` field if the server keyed the
    /// object by id, the key otherwise.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(self.key.as_str())
    }
}

impl BinderData {
    pub fn category_labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::label)
    }
}

#[derive(Default, Deserialize)]
struct CategoryBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

/// Deserializes the `categories` object into a list that keeps document order.
fn categories_in_order<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CategoriesVisitor;

    impl<'de> Visitor<'de> for CategoriesVisitor {
        type Value = Vec<Category>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of categories")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, body)) = map.next_entry::<String, Option<CategoryBody>>()? {
                let body = body.unwrap_or_default();
                out.push(Category {
                    key,
                    name: body.name,
                    color: body.color.filter(|c| !c.is_empty()),
                });
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(CategoriesVisitor)
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}
