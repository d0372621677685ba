use serde::{Deserialize, Deserializer, Serialize};

/// A single dish as stored in `recipes.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tips: Option<String>,
}

impl Recipe {
    /// Minimal record, mostly useful for fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            tags: Vec::new(),
            image: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tips: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instructions<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_tips(mut self, tips: impl Into<String>) -> Self {
        self.tips = Some(tips.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_default() {
        let recipe: Recipe = serde_json::from_str(r#"{"id":"a","title":"Pannkakor"}"#).unwrap();
        assert_eq!(recipe.category, None);
        assert!(recipe.tags.is_empty());
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.tips, None);
    }

    #[test]
    fn blank_and_null_fields_degrade() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"id":"a","title":"Soppa","category":"","image":"  ","tags":null,"tips":""}"#,
        )
        .unwrap();
        assert_eq!(recipe.category, None);
        assert_eq!(recipe.image, None);
        assert_eq!(recipe.tips, None);
        assert!(recipe.tags.is_empty());
    }

    #[test]
    fn tag_lookup_is_exact() {
        let recipe = Recipe::new("a", "Pannkakor").with_tags(["söt", "salt, peppar"]);
        assert!(recipe.has_tag("salt, peppar"));
        assert!(!recipe.has_tag("salt"));
        assert!(!recipe.has_tag("Söt"));
    }
}
