use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn from_optional(buf: Option<&str>) -> Self {
        Self::from(buf.unwrap_or(""))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|v| v.as_str()).filter(|v| !v.is_empty())
    }

    /// Requested page, 1 when absent or not a positive number
    pub fn get_page(&self) -> usize {
        match self.get("page").and_then(|v| v.parse::<usize>().ok()) {
            Some(page) if page > 0 => page,
            _ => 1,
        }
    }
}
