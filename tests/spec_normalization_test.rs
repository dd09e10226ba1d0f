use hwspec_etl::core::spec::{
    clean, clean_opt, split_cpu, split_dimensions, split_display, split_gpu, split_memory_types,
    split_ram, split_storage, Category,
};

#[test]
fn test_documented_examples() {
    assert_eq!(split_ram("16GB8GB"), vec!["16GB", "8GB"]);
    assert_eq!(split_storage("256GB1TB"), vec!["256GB", "1TB"]);
    assert_eq!(
        split_display("1920 x 1200 (OLED)2560 x 1600"),
        vec!["1920 x 1200 (OLED)", "2560 x 1600"]
    );
    assert_eq!(
        split_cpu("Intel Core i7-12700HAMD Ryzen 7 6800H"),
        vec!["Intel Core i7-12700H", "AMD Ryzen 7 6800H"]
    );
    assert_eq!(
        split_memory_types("LPDDR5-8400 - DDR5-6400"),
        vec!["LPDDR5-8400", "DDR5-6400"]
    );
    assert_eq!(
        split_dimensions("300 x 200 mm11 x 8 inches"),
        vec!["300 x 200 mm", "11 x 8 inches"]
    );
}

#[test]
fn test_empty_and_absent_values_yield_no_segments() {
    for category in Category::ALL {
        assert!(category.segment(&clean("")).is_empty(), "{}", category);
        assert!(category.segment(&clean_opt(None)).is_empty(), "{}", category);
    }
}

#[test]
fn test_scraped_marker_is_ignored_by_every_category() {
    let raw = "- \n\t\t\t\tApple M2";
    for category in Category::ALL {
        let segments = category.segment(raw);
        assert_eq!(segments.first().map(String::as_str), Some("Apple M2"), "{}", category);
    }
}

#[test]
fn test_clean_is_idempotent_on_scraped_strings() {
    let samples = [
        "- \n\t\t\t16GB8GB",
        "- \n\t\t\t\t1920 x 1200 (OLED)2560 x 1600",
        "  GeForce RTX 4050  ",
        "",
    ];
    for raw in samples {
        let once = clean(raw);
        assert_eq!(clean(&once), once);
    }
}

#[test]
fn test_order_follows_source_order() {
    assert_eq!(split_ram("32GB16GB8GB"), vec!["32GB", "16GB", "8GB"]);
    assert_eq!(
        split_gpu("Radeon 780MGeForce RTX 4070GeForce RTX 4060"),
        vec!["Radeon 780M", "GeForce RTX 4070", "GeForce RTX 4060"]
    );
}

#[test]
fn test_hyphenated_memory_type_is_one_value() {
    assert_eq!(split_memory_types("LPDDR5x-8533"), vec!["LPDDR5x-8533"]);
    assert_eq!(split_memory_types("DDR5-5600-SODIMM"), vec!["DDR5-5600-SODIMM"]);
}

#[test]
fn test_snapdragon_gpu_string() {
    assert_eq!(
        split_gpu("Qualcomm Adreno X1-85Intel Iris Xe"),
        vec!["Qualcomm", "Adreno X1-85", "Intel Iris Xe"]
    );
}
