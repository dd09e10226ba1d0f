use regex::Regex;
use std::sync::LazyLock;

// 爬蟲列表標記殘留，例如 "- \n\t\t\t"
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \s+[\n\t]*").expect("static regex must compile"));

/// 移除開頭的列表標記殘留並修剪前後空白
///
/// 對已清理過的字串再次呼叫不會有任何改變。
pub fn clean(raw: &str) -> String {
    LIST_MARKER.replace(raw, "").trim().to_string()
}

/// 缺值 (`None`) 視同空字串
pub fn clean_opt(raw: Option<&str>) -> String {
    raw.map(clean).unwrap_or_default()
}
