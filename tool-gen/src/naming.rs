//! Identifier validation and inflection.
//!
//! Names arrive from the command line in either `snake_case` or `CamelCase`,
//! optionally namespaced with `/` (or `::`). Everything downstream works
//! from the underscored form.

use crate::error::{Result, ToolError};

/// Words whose plural is the same as the singular.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// Irregular singular/plural pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

/// Validate a possibly namespaced name.
///
/// Every `/`-separated segment must start with an ASCII letter or underscore,
/// continue with ASCII letters, digits or underscores, and have a letter
/// after any leading underscores so that it camelizes to a class name.
pub fn validate_identifier(name: &str) -> Result<()> {
    let invalid = |reason: &str| ToolError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    for segment in name.replace("::", "/").split('/') {
        let mut chars = segment.chars();
        match chars.next() {
            None => return Err(invalid("empty namespace segment")),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(_) => return Err(invalid("must start with a letter or underscore")),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("can only contain letters, digits, and underscores"));
        }
        if !segment
            .trim_start_matches('_')
            .starts_with(|c: char| c.is_ascii_alphabetic())
        {
            return Err(invalid("needs a letter after any leading underscores"));
        }
    }

    Ok(())
}

/// `BlogPost` -> `blog_post`, `Admin::HTMLPage` -> `admin/html_page`.
pub fn underscore(name: &str) -> String {
    let name = name.replace("::", "/");
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }

    out
}

/// `weather_lookup` -> `WeatherLookup`, `admin/post` -> `Admin::Post`.
pub fn camelize(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Pluralize the last word of an underscored name.
pub fn pluralize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };

    let plural = if last.is_empty() || UNCOUNTABLE.contains(&last) {
        last.to_string()
    } else if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == last) {
        (*plural).to_string()
    } else if IRREGULAR.iter().any(|(_, plural)| *plural == last) {
        last.to_string()
    } else if last.ends_with("ss")
        || last.ends_with("us")
        || last.ends_with('x')
        || last.ends_with('z')
        || last.ends_with("ch")
        || last.ends_with("sh")
    {
        format!("{last}es")
    } else if last.ends_with('s') {
        last.to_string()
    } else if let Some(stem) = last
        .strip_suffix('y')
        .filter(|stem| !stem.ends_with(['a', 'e', 'i', 'o', 'u']))
    {
        format!("{stem}ies")
    } else {
        format!("{last}s")
    };

    format!("{head}{plural}")
}

/// Names derived for a single tool file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    /// Underscored path relative to the tools directory, without extension.
    pub file_path: String,

    /// Class identifier, e.g. `Admin::WeatherLookup`.
    pub class_name: String,

    /// MCP tool name, e.g. `admin_weather_lookup`.
    pub tool_name: String,
}

impl ToolNames {
    pub fn new(name: &str) -> Result<Self> {
        validate_identifier(name)?;
        let file_path = underscore(name);

        Ok(Self {
            class_name: camelize(&file_path),
            tool_name: file_path.replace('/', "_"),
            file_path,
        })
    }
}

/// Names derived for a resource and its five tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// Underscored singular path, e.g. `admin/blog_post`.
    pub singular_path: String,

    /// Underscored plural path, e.g. `admin/blog_posts`.
    pub plural_path: String,

    /// Module that namespaces the five tool classes, e.g. `Admin::BlogPosts`.
    pub module_name: String,

    /// Suffix for tool names, e.g. `admin_blog_post`.
    pub singular_key: String,

    /// Plural suffix for tool names, e.g. `admin_blog_posts`.
    pub plural_key: String,

    /// Request body key, e.g. `blog_post`.
    pub param_key: String,

    /// Route collection path, e.g. `/admin/blog_posts`.
    pub route_path: String,
}

impl ResourceNames {
    pub fn new(name: &str) -> Result<Self> {
        validate_identifier(name)?;
        let singular_path = underscore(name);

        let (namespace, last) = match singular_path.rfind('/') {
            Some(idx) => (&singular_path[..=idx], &singular_path[idx + 1..]),
            None => ("", singular_path.as_str()),
        };
        let plural_path = format!("{namespace}{}", pluralize(last));

        Ok(Self {
            module_name: camelize(&plural_path),
            singular_key: singular_path.replace('/', "_"),
            plural_key: plural_path.replace('/', "_"),
            param_key: last.to_string(),
            route_path: format!("/{plural_path}"),
            plural_path,
            singular_path,
        })
    }

    /// Database table backing the resource, e.g. `admin_blog_posts`.
    pub fn table_name(&self) -> &str {
        &self.plural_key
    }

    /// Human readable singular with an article, e.g. `a blog post`.
    pub fn human_singular(&self) -> String {
        let human = self.param_key.replace('_', " ");
        let article = if human.starts_with(['a', 'e', 'i', 'o', 'u']) {
            "an"
        } else {
            "a"
        };
        format!("{article} {human}")
    }

    /// Human readable plural, e.g. `blog posts`.
    pub fn human_plural(&self) -> String {
        pluralize(&self.param_key).replace('_', " ")
    }
}
