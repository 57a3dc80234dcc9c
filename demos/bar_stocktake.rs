//! 飯店酒吧月結盤點完整範例
//!
//! 展示從開帳、異動、盤點到核准與滾轉的完整流程

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use stocktake::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    println!("===== Hotel Bar Stocktake Example =====\n");

    // 步驟 1: 建立品項目錄
    println!("[1] Create Item Catalog");
    let mut catalog = ItemCatalog::new();
    catalog.insert(Item::new(
        "KEG-GUIN".to_string(),
        "Guinness 50L".to_string(),
        Category::Draught,
        Decimal::from(176),
        Decimal::from(88),
    ));
    println!("    KEG-GUIN: Draught, 88 pints/keg, EUR 176");
    catalog.insert(Item::new(
        "BTL-HEIN".to_string(),
        "Heineken 330ml".to_string(),
        Category::Bottled,
        Decimal::from(24),
        Decimal::from(12),
    ));
    println!("    BTL-HEIN: Bottled, 12 bottles/case, EUR 24");
    catalog.insert(
        Item::new(
            "SYR-COLA".to_string(),
            "Cola Syrup 5L".to_string(),
            Category::Minerals,
            Decimal::new(1215, 2),
            Decimal::from(5000),
        )
        .with_subcategory(Subcategory::Syrups),
    );
    println!("    SYR-COLA: Syrup, 5000ml/container, EUR 12.15 (container-valued)\n");

    // 步驟 2: 建立存儲與飯店配置
    println!("[2] Create Store");
    let config = HotelConfig::new("HOTEL-01".to_string()).with_low_stock_threshold(Decimal::from(2));
    let mut store = StockStore::new(catalog, config);
    println!("    Hotel: HOTEL-01, low stock threshold 2 containers\n");

    // 步驟 3: 開十月帳並初始化盤點單
    println!("[3] Open October Period");
    let october = store.create_period(
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
        PeriodType::Monthly,
    )?;
    let rollover = store.initialize_stocktake(october)?;
    let stocktake_id = rollover.stocktake_id;
    for warning in &rollover.warnings {
        println!("    Warning [{}]: {}", warning.sku, warning.message);
    }
    println!();

    // 步驟 4: 記錄十月異動
    println!("[4] Record Movements");
    let movements = [
        ("KEG-GUIN", MovementType::Purchase, 176, 2),
        ("KEG-GUIN", MovementType::Sale, 38, 15),
        ("BTL-HEIN", MovementType::Purchase, 48, 3),
        ("BTL-HEIN", MovementType::Sale, 10, 20),
        ("SYR-COLA", MovementType::Purchase, 200, 6),
    ];
    for (sku, movement_type, qty, day) in movements {
        store.record_movement(Movement::new(
            "HOTEL-01".to_string(),
            sku.to_string(),
            movement_type,
            Decimal::from(qty),
            Utc.with_ymd_and_hms(2025, 10, day, 18, 0, 0).unwrap(),
        ))?;
    }
    println!("    {} movements recorded\n", store.ledger().len());

    // 步驟 5: 登錄實際盤點
    println!("[5] Enter Physical Counts");
    store.set_counted(stocktake_id, "KEG-GUIN", Decimal::from(1), Decimal::from(50))?;
    println!("    KEG-GUIN: 1 keg + 50 pints");
    store.set_counted(stocktake_id, "BTL-HEIN", Decimal::from(3), Decimal::from(2))?;
    println!("    BTL-HEIN: 3 cases + 2 bottles");
    store.set_counted(stocktake_id, "SYR-COLA", Decimal::from(1), Decimal::ZERO)?;
    println!("    SYR-COLA: 1 container\n");

    // 步驟 6: 草稿即時計算
    println!("[6] Draft Reconciliation");
    let report = store.compute_stocktake(stocktake_id)?;
    for line in &report.lines {
        println!(
            "    {:<10} expected {:>8} counted {:>8} variance {:>8} (EUR {})",
            line.sku,
            line.expected_qty.round_dp(2),
            line.counted_qty.round_dp(2),
            line.variance_qty.round_dp(2),
            line.variance_value.round_dp(2)
        );
    }
    for rollup in &report.rollups {
        println!(
            "    {:<10} counted EUR {:>8}",
            rollup.category.label(),
            rollup.counted_value.round_dp(2)
        );
    }
    for warning in &report.warnings {
        println!("    Warning [{}]: {}", warning.sku, warning.message);
    }
    println!();

    // 步驟 7: 核准（快照具體化 + 期間關帳）
    println!("[7] Approve Stocktake");
    let outcome = store.approve_stocktake(stocktake_id)?;
    println!("    Outcome: {:?}", outcome);
    println!(
        "    Period closed: {}\n",
        store.period(october)?.is_closed
    );

    // 步驟 8: 十一月滾轉
    println!("[8] Roll Over to November");
    let november = store.create_period(
        NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 11, 30).unwrap(),
        PeriodType::Monthly,
    )?;
    let rollover = store.initialize_stocktake(november)?;
    for line in store.stocktake_lines(rollover.stocktake_id)? {
        println!(
            "    {:<10} opening {:>8}",
            line.sku,
            line.opening_qty.round_dp(2)
        );
    }

    println!("\n===== Done =====");
    Ok(())
}
