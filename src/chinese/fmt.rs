//! 格式化日期相關功能
//!
//! 中文月日名之外，另有供曆書說明用的西班牙文形式。

use super::{LunarDate, Month};

/// 漢數字，第 `1..=9` 項分別為「一」到「九」。為便於格式化日期，第 0 項為「十」。
pub const NUM_CHINESE: &[&str] = &["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 干支序號轉為文本形式。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("乙巳", chinese::fmt::sexagenary(42));
/// ```
pub fn sexagenary(num: u32) -> String {
    static NAME1: &[&str] = &["癸", "甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬"];
    static NAME2: &[&str] = &[
        "亥", "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌",
    ];
    NAME1[num.rem_euclid(10) as usize].to_owned() + NAME2[num.rem_euclid(12) as usize]
}

/// 取得月名（含「月」字）。十一、十二月稱「冬月」「臘月」。
///
/// 月序號不在 `1..=12` 間時以阿拉伯數字表示。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{self, Month::*};
///
/// assert_eq!("冬月", chinese::fmt::month(Common(11)));
/// assert_eq!("閏正月", chinese::fmt::month(Leap(1)));
/// ```
pub fn month(m: Month) -> String {
    let mut rt = String::new();
    if m.is_leap() {
        rt += "閏";
    }
    let num = m.num();
    match num {
        1 => rt += "正",
        2..=9 => rt += NUM_CHINESE[num as usize],
        10 => rt += "十",
        11 => rt += "冬",
        12 => rt += "臘",
        _ => rt += &num.to_string(),
    }
    rt += "月";
    rt
}

/// 取得日名，前十日為「初一」到「初十」，第 21 至 29 日為「廿一」到「廿九」。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("初十", chinese::fmt::day(10));
/// assert_eq!("廿五", chinese::fmt::day(25));
/// assert_eq!("三十", chinese::fmt::day(30));
/// ```
///
/// # Panics
///
/// 若日序號不在 `1..=30` 間則 panic。
pub fn day(d: u32) -> String {
    match d {
        1..=10 => "初",
        11..=19 => "十",
        20 => "二",
        21..=29 => "廿",
        30 => "三",
        _ => panic!("day {} not in 1..=30", d),
    }
    .to_owned()
        + NUM_CHINESE[(d % 10) as usize]
}

/// 月曆格中顯示的短標籤：初一顯示月名，其餘顯示日名。
///
/// ```
/// use nongli::chinese::{self, LunarDate, Month::*};
///
/// let first = LunarDate::new(2023, Leap(2), 1).unwrap();
/// assert_eq!("閏二月", chinese::fmt::label(&first));
/// let mid = LunarDate::new(2023, Leap(2), 15).unwrap();
/// assert_eq!("十五", chinese::fmt::label(&mid));
/// ```
pub fn label(lunar: &LunarDate) -> String {
    if lunar.day() == 1 {
        month(lunar.month())
    } else {
        day(lunar.day())
    }
}

/// 西班牙文月名，如 `Mes 2`；閏月加註 `(intercalar)`。
pub fn month_es(m: Month) -> String {
    if m.is_leap() {
        format!("Mes {} (intercalar)", m.num())
    } else {
        format!("Mes {}", m.num())
    }
}

/// 西班牙文的農曆月日說明，用於曆書事件描述。
///
/// ```
/// use nongli::chinese::{self, LunarDate, Month::*};
///
/// let lunar = LunarDate::new(2024, Common(8), 15).unwrap();
/// assert_eq!("Mes Lunar 8, Día 15", chinese::fmt::description_es(&lunar));
/// let leap = LunarDate::new(2023, Leap(2), 1).unwrap();
/// assert_eq!("Mes Lunar 2 (intercalar), Día 1", chinese::fmt::description_es(&leap));
/// ```
pub fn description_es(lunar: &LunarDate) -> String {
    let m = lunar.month();
    if m.is_leap() {
        format!("Mes Lunar {} (intercalar), Día {}", m.num(), lunar.day())
    } else {
        format!("Mes Lunar {}, Día {}", m.num(), lunar.day())
    }
}
