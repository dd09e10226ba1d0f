//! 各規格類別的切分規則
//!
//! 所有函式都接受原始或已清理的字串 (清理是冪等的)，回傳依原字串由左至右
//! 排列、修剪過且非空的值。任何輸入都不會回傳錯誤；最差情況是切多或切少。
//!
//! `regex` 不支援 lookahead，因此「在某個樣式之前/之後切開」的規則一律
//! 先收集切點位移，再交給 [`cut_at`] 切片。

use super::clean::clean;
use regex::Regex;
use std::sync::LazyLock;

static RAM_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GB[0-9]").expect("static regex must compile"));

static STORAGE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:GB|TB)[0-9]").expect("static regex must compile"));

// 寬/高各 3~4 位數，例如 "1920 x 1200"、"2560x1600"。
// 高度取最短匹配，下一次掃描才能從緊接的寬度開始 ("1366 x 7681920 x 1080")；
// 寬度不以 0 開頭，避免把四位數高度剩下的 "0" 當成下一個寬度的開頭。
static RESOLUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[1-9][0-9]{2,3}\s*x\s*[0-9]{3,4}?").expect("static regex must compile")
});

static CPU_BRAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Intel|AMD|Apple|Qualcomm|Snapdragon").expect("static regex must compile")
});

static GPU_BRAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"GeForce|Radeon|Intel|Apple|Nvidia|Adreno|Qualcomm")
        .expect("static regex must compile")
});

const UNIT_LEN: usize = 2;
const MEMORY_TYPE_DELIMITER: &str = " - ";

/// 依位移切開字串；位移 0 與字串尾端會被忽略
fn cut_at(s: &str, offsets: impl IntoIterator<Item = usize>) -> Vec<String> {
    let mut cuts: Vec<usize> = offsets
        .into_iter()
        .filter(|&i| i > 0 && i < s.len())
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(s.len())) {
        let part = s[start..cut].trim();
        if !part.is_empty() {
            segments.push(part.to_string());
        }
        start = cut;
    }
    segments
}

/// 不切分：空字串回傳空序列，否則整串為單一值
fn whole(s: String) -> Vec<String> {
    if s.is_empty() {
        Vec::new()
    } else {
        vec![s]
    }
}

fn split_after_unit(raw: &str, pattern: &Regex) -> Vec<String> {
    let cleaned = clean(raw);
    let cuts = pattern.find_iter(&cleaned).map(|m| m.start() + UNIT_LEN);
    cut_at(&cleaned, cuts)
}

fn split_before(raw: &str, pattern: &Regex) -> Vec<String> {
    let cleaned = clean(raw);
    let cuts = pattern.find_iter(&cleaned).map(|m| m.start());
    cut_at(&cleaned, cuts)
}

/// "16GB8GB" -> ["16GB", "8GB"]
pub fn split_ram(raw: &str) -> Vec<String> {
    split_after_unit(raw, &RAM_BREAK)
}

/// "256GB1TB" -> ["256GB", "1TB"]
pub fn split_storage(raw: &str) -> Vec<String> {
    split_after_unit(raw, &STORAGE_BREAK)
}

/// 在每個非開頭的解析度樣式前切開，面板註記留在前一段。
///
/// 字串中沒有 `" x "` 時不切分。註記文字本身若長得像解析度
/// (例如 "(1200 x 800 touch)") 會造成多切，這是此啟發式已知的限制。
pub fn split_display(raw: &str) -> Vec<String> {
    let cleaned = clean(raw);
    if !cleaned.contains(" x ") {
        return whole(cleaned);
    }
    let cuts = RESOLUTION.find_iter(&cleaned).map(|m| m.start());
    cut_at(&cleaned, cuts)
}

/// 在每個非開頭的處理器品牌名稱前切開
pub fn split_cpu(raw: &str) -> Vec<String> {
    split_before(raw, &CPU_BRAND)
}

/// 在每個非開頭的顯示晶片品牌名稱前切開
pub fn split_gpu(raw: &str) -> Vec<String> {
    split_before(raw, &GPU_BRAND)
}

/// 公制/英制尺寸黏在一起時切開，例如 "300 x 200 mm11 x 8 inches"。
///
/// 只有同時出現 "mm" 與 "inches" 才切；切點在第一個 "mm" 與第一個 "inches"
/// 之後。資料中偶見把 "mm" 打成 "nm"，所以第一個 "nm" 之後也視為切點，
/// 僅此一例，不延伸到其他單位。
pub fn split_dimensions(raw: &str) -> Vec<String> {
    let cleaned = clean(raw);
    if !(cleaned.contains("mm") && cleaned.contains("inches")) {
        return whole(cleaned);
    }
    let cuts = ["nm", "mm", "inches"]
        .iter()
        .filter_map(|unit| cleaned.find(unit).map(|i| i + unit.len()));
    cut_at(&cleaned, cuts)
}

/// 以 `" - "` 分隔記憶體類型；值內部的連字號 (如 "LPDDR5-8400") 不切
pub fn split_memory_types(raw: &str) -> Vec<String> {
    let cleaned = clean(raw);
    if !cleaned.contains(MEMORY_TYPE_DELIMITER) {
        return whole(cleaned);
    }
    cleaned
        .split(MEMORY_TYPE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cut_at_ignores_edges_and_duplicates() {
        assert_eq!(cut_at("abcdef", [0, 3, 3, 6, 9]), v(&["abc", "def"]));
        assert_eq!(cut_at("   ", [1]), Vec::<String>::new());
    }

    #[test]
    fn test_split_ram() {
        assert_eq!(split_ram("16GB8GB"), v(&["16GB", "8GB"]));
        assert_eq!(split_ram("8GB16GB32GB"), v(&["8GB", "16GB", "32GB"]));
        assert_eq!(split_ram("- \n\t\t\t16GB"), v(&["16GB"]));
        // "GB" 後面不是數字就不切
        assert_eq!(split_ram("16GB LPDDR5"), v(&["16GB LPDDR5"]));
    }

    #[test]
    fn test_split_storage() {
        assert_eq!(split_storage("256GB1TB"), v(&["256GB", "1TB"]));
        assert_eq!(split_storage("512GB1TB2TB"), v(&["512GB", "1TB", "2TB"]));
        assert_eq!(split_storage("1TB SSD"), v(&["1TB SSD"]));
        // RAM 規則不認得 TB
        assert_eq!(split_ram("1TB2TB"), v(&["1TB2TB"]));
    }

    #[test]
    fn test_split_display() {
        assert_eq!(
            split_display("1920 x 1200 (OLED)2560 x 1600"),
            v(&["1920 x 1200 (OLED)", "2560 x 1600"])
        );
        assert_eq!(
            split_display("1920 x 12002560 x 1600"),
            v(&["1920 x 1200", "2560 x 1600"])
        );
        assert_eq!(
            split_display("1920 x 1080 (IPS, 144Hz)2560 x 1440 (165Hz)3840 x 2160"),
            v(&["1920 x 1080 (IPS, 144Hz)", "2560 x 1440 (165Hz)", "3840 x 2160"])
        );
    }

    #[test]
    fn test_split_display_three_digit_heights() {
        assert_eq!(
            split_display("1366 x 7681920 x 1080"),
            v(&["1366 x 768", "1920 x 1080"])
        );
        assert_eq!(
            split_display("1280 x 8002560 x 1600 (OLED)"),
            v(&["1280 x 800", "2560 x 1600 (OLED)"])
        );
        assert_eq!(
            split_display("1440 x 9001920 x 1200 (IPS)2560 x 1600"),
            v(&["1440 x 900", "1920 x 1200 (IPS)", "2560 x 1600"])
        );
    }

    #[test]
    fn test_split_display_three_digit_width_after_four_digit_height() {
        assert_eq!(
            split_display("1920 x 1200800 x 600"),
            v(&["1920 x 1200", "800 x 600"])
        );
    }

    #[test]
    fn test_split_display_without_spaced_x_is_unsplit() {
        assert_eq!(split_display("2560x16003840x2400"), v(&["2560x16003840x2400"]));
        assert_eq!(split_display("Retina"), v(&["Retina"]));
    }

    #[test]
    fn test_split_display_known_missplit_on_annotation() {
        // 註記中的解析度樣式也會被當成新的一段
        assert_eq!(
            split_display("2880 x 1800 (scaled 1440 x 900)"),
            v(&["2880 x 1800 (scaled", "1440 x 900)"])
        );
    }

    #[test]
    fn test_split_cpu() {
        assert_eq!(
            split_cpu("Intel Core i7-12700HAMD Ryzen 7 6800H"),
            v(&["Intel Core i7-12700H", "AMD Ryzen 7 6800H"])
        );
        assert_eq!(
            split_cpu("Apple M3Apple M3 ProApple M3 Max"),
            v(&["Apple M3", "Apple M3 Pro", "Apple M3 Max"])
        );
        assert_eq!(split_cpu("AMD Ryzen 9 7940HS"), v(&["AMD Ryzen 9 7940HS"]));
    }

    #[test]
    fn test_split_cpu_known_missplit_on_brand_pair() {
        assert_eq!(
            split_cpu("Qualcomm Snapdragon X Elite"),
            v(&["Qualcomm", "Snapdragon X Elite"])
        );
    }

    #[test]
    fn test_split_gpu() {
        assert_eq!(
            split_gpu("Intel Iris XeGeForce RTX 3050"),
            v(&["Intel Iris Xe", "GeForce RTX 3050"])
        );
        assert_eq!(
            split_gpu("GeForce RTX 4060Radeon 780MAdreno X1-85"),
            v(&["GeForce RTX 4060", "Radeon 780M", "Adreno X1-85"])
        );
        assert_eq!(split_gpu("Apple M2 10-core GPU"), v(&["Apple M2 10-core GPU"]));
    }

    #[test]
    fn test_split_gpu_known_missplit_on_vendor_prefix() {
        assert_eq!(
            split_gpu("Nvidia GeForce RTX 4070"),
            v(&["Nvidia", "GeForce RTX 4070"])
        );
    }

    #[test]
    fn test_split_dimensions() {
        assert_eq!(
            split_dimensions("300 x 200 mm11 x 8 inches"),
            v(&["300 x 200 mm", "11 x 8 inches"])
        );
        assert_eq!(
            split_dimensions("300 x 200 mm"),
            v(&["300 x 200 mm"])
        );
        assert_eq!(
            split_dimensions("11 x 8 inches"),
            v(&["11 x 8 inches"])
        );
    }

    #[test]
    fn test_split_dimensions_nm_typo() {
        assert_eq!(
            split_dimensions("248 nm19 mm9.8 inches"),
            v(&["248 nm", "19 mm", "9.8 inches"])
        );
    }

    #[test]
    fn test_split_memory_types() {
        assert_eq!(
            split_memory_types("LPDDR5-8400 - DDR5-6400"),
            v(&["LPDDR5-8400", "DDR5-6400"])
        );
        assert_eq!(
            split_memory_types("- \n\t\t\tLPDDR5-8400 - LPDDR5x-8400 - DDR5-6400"),
            v(&["LPDDR5-8400", "LPDDR5x-8400", "DDR5-6400"])
        );
        assert_eq!(split_memory_types("LPDDR5x-7500"), v(&["LPDDR5x-7500"]));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let splitters: [fn(&str) -> Vec<String>; 7] = [
            split_ram,
            split_storage,
            split_display,
            split_cpu,
            split_gpu,
            split_dimensions,
            split_memory_types,
        ];
        for split in splitters {
            assert!(split("").is_empty());
            assert!(split("- \n\t\t\t").is_empty());
            assert!(split("   ").is_empty());
        }
    }

    #[test]
    fn test_segments_reconstruct_input() {
        let cases: [(fn(&str) -> Vec<String>, &str); 4] = [
            (split_ram, "4GB8GB16GB"),
            (split_display, "1920 x 1200 (OLED)2560 x 1600"),
            (split_cpu, "Intel Core i5-1335UIntel Core i7-1355U"),
            (split_dimensions, "300 x 200 mm11 x 8 inches"),
        ];
        for (split, input) in cases {
            let joined: String = split(input).concat();
            let expected: String = input.chars().filter(|c| !c.is_whitespace()).collect();
            let actual: String = joined.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(actual, expected, "input: {:?}", input);
        }
    }
}
