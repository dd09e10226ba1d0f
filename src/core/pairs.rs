/// 依序產生 `count` 組循環相鄰的比較配對：(items[i], items[i + 1])，尾端接回開頭
pub fn comparison_pairs<T: Clone>(items: &[T], count: usize) -> Vec<(T, T)> {
    if items.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|i| {
            let first = i % items.len();
            let second = (i + 1) % items.len();
            (items[first].clone(), items[second].clone())
        })
        .collect()
}
