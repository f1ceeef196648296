use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, KeyAndValueRef, MetadataMap};

use crate::error::ChainError;

/// 出站请求头。按插入顺序保存，同名 header 允许出现多次。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条 header，不会覆盖已有的同名条目。
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// 第一条同名 header 的值，名字大小写不敏感。
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` 是否以 `prefix` 的全部条目开头（只追加不修改）。
    pub fn extends(&self, prefix: &Metadata) -> bool {
        self.entries.starts_with(&prefix.entries)
    }

    /// 从 tonic 的 metadata 读出 ascii 条目，binary 条目不参与拦截。
    pub fn from_map(map: &MetadataMap) -> Self {
        let entries = map
            .iter()
            .filter_map(|kv| match kv {
                KeyAndValueRef::Ascii(key, value) => value
                    .to_str()
                    .ok()
                    .map(|v| (key.as_str().to_string(), v.to_string())),
                KeyAndValueRef::Binary(..) => None,
            })
            .collect();
        Self { entries }
    }

    /// 把 `skip` 之后追加的条目写回 tonic 的 metadata。
    pub(crate) fn append_tail_to(&self, skip: usize, map: &mut MetadataMap) -> Result<(), ChainError> {
        for (name, value) in self.entries.iter().skip(skip) {
            let key = AsciiMetadataKey::from_bytes(name.as_bytes())
                .map_err(|_| ChainError::InvalidMetadata(name.clone()))?;
            let value = AsciiMetadataValue::try_from(value.as_str())
                .map_err(|_| ChainError::InvalidMetadata(name.clone()))?;
            map.append(key, value);
        }
        Ok(())
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_duplicates_in_order() {
        let mut md = Metadata::new();
        md.add("x-trace", "1");
        md.add("Api-Key", "a");
        md.add("x-trace", "2");

        assert_eq!(md.len(), 3);
        assert_eq!(md.get("X-TRACE"), Some("1"));
        assert_eq!(md.get_all("x-trace").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(
            md.iter().collect::<Vec<_>>(),
            vec![("x-trace", "1"), ("Api-Key", "a"), ("x-trace", "2")]
        );
    }

    #[test]
    fn value_outlives_lookup_name() {
        let md: Metadata = [("Api-Key", "secret123")].into_iter().collect();

        let value = {
            let name = String::from("api-key");
            md.get(&name)
        };

        assert_eq!(value, Some("secret123"));
        assert!(md.contains("API-KEY"));
        assert_eq!(md.get("missing"), None);
    }

    #[test]
    fn extends_detects_rewrites() {
        let before: Metadata = [("a", "1"), ("b", "2")].into_iter().collect();
        let mut after = before.clone();
        after.add("c", "3");
        assert!(after.extends(&before));

        let rewritten: Metadata = [("a", "1"), ("b", "changed"), ("c", "3")].into_iter().collect();
        assert!(!rewritten.extends(&before));
    }

    #[test]
    fn from_map_skips_binary_entries() {
        let mut map = MetadataMap::new();
        map.insert("user-agent", "x".parse().unwrap());
        map.insert_bin("trace-bin", tonic::metadata::BinaryMetadataValue::from_bytes(b"\x00\x01"));

        let md = Metadata::from_map(&map);
        assert_eq!(md.iter().collect::<Vec<_>>(), vec![("user-agent", "x")]);
    }

    #[test]
    fn append_tail_only_writes_new_entries() {
        let mut map = MetadataMap::new();
        map.insert("user-agent", "x".parse().unwrap());
        let mut md = Metadata::from_map(&map);
        let skip = md.len();
        md.add("Api-Key", "secret123");

        md.append_tail_to(skip, &mut map).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("api-key").unwrap(), "secret123");
        assert_eq!(map.get_all("user-agent").iter().count(), 1);
    }

    #[test]
    fn append_tail_rejects_invalid_names() {
        let mut md = Metadata::new();
        md.add("bad header", "v");
        let err = md.append_tail_to(0, &mut MetadataMap::new()).unwrap_err();
        assert_eq!(err, ChainError::InvalidMetadata("bad header".to_string()));
    }
}
