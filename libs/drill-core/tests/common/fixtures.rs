//! Sample item pools.

/// The vowel row of hiragana.
pub fn vowel_row() -> Vec<String> {
    ["あ", "い", "う", "え", "お"].iter().map(|s| s.to_string()).collect()
}

/// The basic hiragana table without the obsolete ゐ and ゑ.
pub fn gojuon() -> Vec<String> {
    "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをん"
        .chars()
        .map(|c| c.to_string())
        .collect()
}

/// `n` distinct synthetic item ids.
pub fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("item-{i}")).collect()
}
