//! 重新開帳循環範例
//!
//! 展示核准後發現計數錯誤時的修正流程

use chrono::NaiveDate;
use rust_decimal::Decimal;
use stocktake::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("===== Reopen Cycle Example =====\n");

    // 步驟 1: 準備目錄與存儲
    println!("[1] Setup");
    let mut catalog = ItemCatalog::new();
    catalog.insert(Item::new(
        "SPR-JAME".to_string(),
        "Jameson 70cl".to_string(),
        Category::Spirits,
        Decimal::from(28),
        Decimal::from(28),
    ));
    let mut store = StockStore::new(catalog, HotelConfig::new("HOTEL-01".to_string()));

    let october = store.create_period(
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
        PeriodType::Monthly,
    )?;
    let stocktake_id = store.initialize_stocktake(october)?.stocktake_id;
    println!("    Period and stocktake ready\n");

    // 步驟 2: 錯誤計數後核准
    println!("[2] Approve With Wrong Count");
    store.set_counted(stocktake_id, "SPR-JAME", Decimal::from(3), Decimal::ZERO)?;
    store.approve_stocktake(stocktake_id)?;
    println!(
        "    Closing snapshot: {:?} bottles\n",
        store
            .snapshots()
            .get("SPR-JAME", october)
            .map(|s| s.closing_full_units)
    );

    // 步驟 3: 已核准的盤點單唯讀
    println!("[3] Approved Stocktake Is Read-Only");
    let err = store.set_counted(stocktake_id, "SPR-JAME", Decimal::from(4), Decimal::ZERO);
    println!("    Edit rejected: {}\n", err.unwrap_err());

    // 步驟 4: 重新開帳（原子性：期間開帳 + 草稿 + 快照清空 + 審計）
    println!("[4] Reopen Period");
    store.reopen_period(october, "duty-manager")?;
    println!("    Period closed: {}", store.period(october)?.is_closed);
    println!(
        "    Stocktake status: {:?}",
        store.stocktake(stocktake_id)?.status
    );
    println!(
        "    Snapshots left: {}",
        store.snapshots().period_snapshots(october).len()
    );
    println!(
        "    Audit trail: {} entries\n",
        store.reopen_audits().len()
    );

    // 步驟 5: 修正後再核准
    println!("[5] Correct and Re-Approve");
    store.set_counted(stocktake_id, "SPR-JAME", Decimal::from(4), Decimal::ZERO)?;
    let outcome = store.approve_stocktake(stocktake_id)?;
    println!("    Outcome: {:?}", outcome);
    println!(
        "    Closing snapshot: {:?} bottles",
        store
            .snapshots()
            .get("SPR-JAME", october)
            .map(|s| s.closing_full_units)
    );

    println!("\n===== Done =====");
    Ok(())
}
