//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序以預編的逐年月序數據（見 [`data`]）推算 1900 至 2100 年的農曆，
//! 不作天文計算。支持的公曆日期為 1900-01-31（1900 年正月初一）至
//! 2100-12-31。

use std::fmt as std_fmt;

use crate::date::Date;
use crate::error::CalendarError;

pub mod data;
pub mod fmt;

/// 起算日 1900-01-31 的儒略日數，即 1900 年正月初一。
const EPOCH_JDN: u32 = 2415051;
/// 支持範圍末日 2100-12-31 的儒略日數。
const LAST_JDN: u32 = 2488434;

/// 起算日，1900 年正月初一（公曆 1900-01-31）。
pub fn epoch() -> Date {
    Date::from_jdn(EPOCH_JDN)
}

/// 支持範圍的最末一日（公曆 2100-12-31）。
pub fn last_supported_date() -> Date {
    Date::from_jdn(LAST_JDN)
}

/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「臘月」。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}
impl std_fmt::Display for Month {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.write_str(&self.name())
    }
}

/// 一個農曆年（正月初一至次年正月初一前日）的月序信息。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{LunarYear, Month::*};
///
/// let year = LunarYear::new(2023).unwrap();
/// assert_eq!(Some(2), year.leap_month());
/// assert_eq!(384, year.days());
///
/// let months: Vec<_> = year.months().map(|(m, _)| m).take(4).collect();
/// assert_eq!(vec![Common(1), Common(2), Leap(2), Common(3)], months);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LunarYear {
    year: i32,
    info: u32,
}

impl LunarYear {
    /// 取得農曆 `year` 年。
    ///
    /// 年份不在 1900..=2100 間則回報 [`CalendarError::YearOutOfRange`]。
    pub fn new(year: i32) -> Result<Self, CalendarError> {
        Ok(Self {
            year,
            info: data::entry(year)?,
        })
    }
    /// 年序號
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 閏月月序，無閏月則為 `None`。
    pub fn leap_month(&self) -> Option<u32> {
        match self.info & 0xf {
            0 => None,
            m => Some(m),
        }
    }
    /// 閏月日數，無閏月則為 0。
    pub fn leap_month_length(&self) -> u32 {
        leap_length_of(self.info)
    }
    /// 平月 `month` 的日數；`month` 須在 `1..=12` 間。
    fn common_month_length(&self, month: u32) -> u32 {
        if self.info & (0x10000 >> month) != 0 {
            30
        } else {
            29
        }
    }
    /// 取得該年某月日數，平閏皆可。該年無此月則返回 `None`。
    ///
    /// ```
    /// use nongli::chinese::{LunarYear, Month::*};
    ///
    /// let year = LunarYear::new(2023).unwrap();
    /// assert_eq!(Some(30), year.length_of(Common(2)));
    /// assert_eq!(Some(29), year.length_of(Leap(2)));
    /// assert_eq!(None, year.length_of(Leap(3)));
    /// ```
    pub fn length_of(&self, month: Month) -> Option<u32> {
        match month {
            Month::Common(m) if (1..=12).contains(&m) => Some(self.common_month_length(m)),
            Month::Leap(m) if self.leap_month() == Some(m) => Some(self.leap_month_length()),
            _ => None,
        }
    }
    /// 全年日數。
    pub fn days(&self) -> u32 {
        days_of(self.info)
    }
    /// 依序列出全年各月及其日數，閏月緊隨其所閏之月。
    pub fn months(&self) -> Months {
        Months {
            year: *self,
            next: Some(Month::Common(1)),
        }
    }
    /// 月序的狀態轉移：平月若為所閏之月則轉入閏月，否則轉入次一平月；
    /// 閏月轉入次一平月；十二月之後全年結束。
    fn after(&self, month: Month) -> Option<Month> {
        match month {
            Month::Common(m) if self.leap_month() == Some(m) => Some(Month::Leap(m)),
            Month::Common(m) | Month::Leap(m) if m < 12 => Some(Month::Common(m + 1)),
            _ => None,
        }
    }
    /// 正月初一的公曆日期。
    ///
    /// ```
    /// use nongli::chinese::LunarYear;
    ///
    /// let year = LunarYear::new(2024).unwrap();
    /// assert_eq!("2024-02-10", year.first_day().iso_gregorian());
    /// ```
    pub fn first_day(&self) -> Date {
        let offset: u32 = data::LUNAR_INFO[..(self.year - data::FIRST_YEAR) as usize]
            .iter()
            .map(|&info| days_of(info))
            .sum();
        epoch() + offset as i32
    }
    /// 某月初一的公曆日期。該年無此月則返回 `None`。
    pub fn month_start(&self, month: Month) -> Option<Date> {
        self.length_of(month)?;
        let offset: u32 = self
            .months()
            .take_while(|&(m, _)| m != month)
            .map(|(_, len)| len)
            .sum();
        Some(self.first_day() + offset as i32)
    }
}

fn leap_length_of(info: u32) -> u32 {
    match (info & 0xf, info & 0x10000) {
        (0, _) => 0,
        (_, 0) => 29,
        _ => 30,
    }
}

fn days_of(info: u32) -> u32 {
    348 + ((info >> 4) & 0xfff).count_ones() + leap_length_of(info)
}

/// [`LunarYear::months`] 返回的迭代器，產出 `(月, 日數)`。
#[derive(Debug, Clone)]
pub struct Months {
    year: LunarYear,
    next: Option<Month>,
}

impl Iterator for Months {
    type Item = (Month, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let month = self.next?;
        self.next = self.year.after(month);
        let len = match month {
            Month::Common(m) => self.year.common_month_length(m),
            Month::Leap(_) => self.year.leap_month_length(),
        };
        Some((month, len))
    }
}

/// 農曆日期。
///
/// 構造時即校驗：日不超過該月日數，閏月只能是該年所閏之月。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::{LunarDate, Month::*};
///
/// let date = Date::from_gregorian(2023, 3, 22).unwrap();
/// let lunar = LunarDate::from_date(date).unwrap();
///
/// assert_eq!((2023, Leap(2), 1), (lunar.year(), lunar.month(), lunar.day()));
/// assert!(lunar.is_leap_month());
/// assert_eq!(date, lunar.to_date());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LunarDate {
    year: LunarYear,
    month: Month,
    day: u32,
}

impl LunarDate {
    /// 以年月日構造農曆日期。
    ///
    /// 年份超出範圍則回報 [`CalendarError::YearOutOfRange`]；該年無此月或無此日則回報
    /// [`CalendarError::InvalidLunarDate`]。
    pub fn new(year: i32, month: Month, day: u32) -> Result<Self, CalendarError> {
        let lunar_year = LunarYear::new(year)?;
        match lunar_year.length_of(month) {
            Some(len) if (1..=len).contains(&day) => Ok(Self {
                year: lunar_year,
                month,
                day,
            }),
            _ => Err(CalendarError::InvalidLunarDate { year, month, day }),
        }
    }

    /// 取得公曆日期所對應的農曆日期。
    ///
    /// 先自起算日逐年減去整年日數定年，再依月序狀態逐月減去整月日數定月，餘數加一為日。
    ///
    /// 日期不在 1900-01-31..=2100-12-31 間則回報 [`CalendarError::DateOutOfRange`]。
    pub fn from_date(date: Date) -> Result<Self, CalendarError> {
        if date < epoch() || date > last_supported_date() {
            return Err(CalendarError::DateOutOfRange { date });
        }
        let mut offset = (date - epoch()) as u32;

        let mut lunar_year = LunarYear::new(data::FIRST_YEAR)?;
        while offset >= lunar_year.days() {
            offset -= lunar_year.days();
            lunar_year = LunarYear::new(lunar_year.year + 1)
                .map_err(|_| CalendarError::DateOutOfRange { date })?;
        }

        // 餘數恰等於某月日數時，所求日為下一月（平或閏）初一，而非本月末日。
        for (month, len) in lunar_year.months() {
            if offset < len {
                return Ok(Self {
                    year: lunar_year,
                    month,
                    day: offset + 1,
                });
            }
            offset -= len;
        }
        Err(CalendarError::DateOutOfRange { date })
    }

    /// 取得該農曆日期的公曆日期。
    ///
    /// 2100 年末數月可落在 2101 年，超出 [`LunarDate::from_date`] 支持的範圍。
    pub fn to_date(&self) -> Date {
        let offset: u32 = self
            .year
            .months()
            .take_while(|&(m, _)| m != self.month)
            .map(|(_, len)| len)
            .sum();
        self.year.first_day() + (offset + self.day - 1) as i32
    }

    /// 年
    pub fn year(&self) -> i32 {
        self.year.year
    }
    /// 所在農曆年
    pub fn lunar_year(&self) -> LunarYear {
        self.year
    }
    /// 月
    pub fn month(&self) -> Month {
        self.month
    }
    /// 日，`1..=30`
    pub fn day(&self) -> u32 {
        self.day
    }
    /// 是否閏月
    pub fn is_leap_month(&self) -> bool {
        self.month.is_leap()
    }
    /// 本月日數
    pub fn month_length(&self) -> u32 {
        match self.month {
            Month::Common(m) => self.year.common_month_length(m),
            Month::Leap(_) => self.year.leap_month_length(),
        }
    }
    /// 年干支名，如「癸卯」。
    pub fn year_name(&self) -> String {
        fmt::sexagenary(sexagenary_for_year(self.year.year))
    }
}

impl std_fmt::Display for LunarDate {
    /// 形如「2023年閏二月初一」。
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        write!(f, "{}年{}{}", self.year.year, self.month, fmt::day(self.day))
    }
}

/// 農曆 `year` 年全年日數：348 加大月數，再加閏月日數。
///
/// ```
/// assert_eq!(Ok(354), nongli::chinese::year_length(2024));
/// ```
pub fn year_length(year: i32) -> Result<u32, CalendarError> {
    Ok(LunarYear::new(year)?.days())
}

/// 農曆 `year` 年的閏月月序，無閏月為 `None`。
pub fn leap_month(year: i32) -> Result<Option<u32>, CalendarError> {
    Ok(LunarYear::new(year)?.leap_month())
}

/// 農曆 `year` 年閏月日數，無閏月為 0。
pub fn leap_month_length(year: i32) -> Result<u32, CalendarError> {
    Ok(LunarYear::new(year)?.leap_month_length())
}

/// 農曆 `year` 年平月 `month` 的日數。閏月日數見 [`leap_month_length`]。
///
/// `month` 不在 `1..=12` 間則回報 [`CalendarError::InvalidMonth`]。
pub fn month_length(year: i32, month: u32) -> Result<u32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    Ok(LunarYear::new(year)?.common_month_length(month))
}

/// 取得公曆日期所對應的農曆日期，同 [`LunarDate::from_date`]。
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::{gregorian_to_lunar, Month::*};
///
/// let lunar = gregorian_to_lunar(Date::from_gregorian(2000, 1, 1).unwrap()).unwrap();
/// assert_eq!((1999, Common(11), 25), (lunar.year(), lunar.month(), lunar.day()));
/// ```
pub fn gregorian_to_lunar(date: Date) -> Result<LunarDate, CalendarError> {
    LunarDate::from_date(date)
}

/// 取得所給公元年的干支。
///
/// # 用例
///
/// ```
/// use nongli::chinese::sexagenary_for_year;
///
/// assert_eq!(1, sexagenary_for_year(-2696));
/// ```
pub fn sexagenary_for_year(year: i32) -> u32 {
    (year.rem_euclid(60) as u32 + 2696) % 60 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use Month::*;

    fn lunar(y: i32, m: i32, d: i32) -> Result<(i32, Month, u32), CalendarError> {
        LunarDate::from_date(Date::from_gregorian(y, m, d).unwrap())
            .map(|l| (l.year(), l.month(), l.day()))
    }

    #[test]
    fn epoch_constants() {
        assert_eq!(Date::from_gregorian(1900, 1, 31), Some(epoch()));
        assert_eq!(Date::from_gregorian(2100, 12, 31), Some(last_supported_date()));
    }

    #[test]
    fn dates() {
        let data = [
            ((1900, 1, 31), (1900, Common(1), 1)),
            ((2000, 1, 1), (1999, Common(11), 25)),
            ((2017, 7, 22), (2017, Common(6), 29)),
            ((2017, 7, 23), (2017, Leap(6), 1)),
            ((2023, 1, 22), (2023, Common(1), 1)),
            ((2023, 2, 19), (2023, Common(1), 29)),
            ((2023, 2, 20), (2023, Common(2), 1)),
            ((2023, 3, 21), (2023, Common(2), 30)),
            ((2023, 3, 22), (2023, Leap(2), 1)),
            ((2023, 4, 19), (2023, Leap(2), 29)),
            ((2023, 4, 20), (2023, Common(3), 1)),
            ((2024, 2, 9), (2023, Common(12), 30)),
            ((2024, 2, 10), (2024, Common(1), 1)),
            ((2025, 1, 28), (2024, Common(12), 29)),
            ((2100, 12, 31), (2100, Common(12), 1)),
        ];
        for ((y, m, d), std) in data {
            assert_eq!(Ok(std), lunar(y, m, d), "{y:04}-{m:02}-{d:02}");
        }
    }

    #[test]
    fn out_of_range() {
        for (y, m, d) in [(1899, 12, 31), (1900, 1, 30), (2101, 1, 1)] {
            let date = Date::from_gregorian(y, m, d).unwrap();
            assert_eq!(
                Err(CalendarError::DateOutOfRange { date }),
                LunarDate::from_date(date)
            );
        }
    }

    #[test]
    fn leap_month_follows_base_month() {
        let year = LunarYear::new(2020).unwrap();
        let months: Vec<_> = year.months().map(|(m, _)| m).collect();
        assert_eq!(13, months.len());
        assert_eq!(
            vec![
                Common(1),
                Common(2),
                Common(3),
                Common(4),
                Leap(4),
                Common(5),
                Common(6),
                Common(7),
                Common(8),
                Common(9),
                Common(10),
                Common(11),
                Common(12),
            ],
            months
        );
    }

    #[test]
    fn common_year_has_twelve_months() {
        let year = LunarYear::new(2024).unwrap();
        assert_eq!(None, year.leap_month());
        assert_eq!(0, year.leap_month_length());
        let lengths: Vec<_> = year.months().map(|(_, len)| len).collect();
        assert_eq!(vec![29, 30, 29, 29, 30, 29, 30, 30, 29, 30, 30, 29], lengths);
        assert_eq!(354, lengths.iter().sum::<u32>());
    }

    #[test]
    fn free_functions() {
        assert_eq!(Ok(384), year_length(2023));
        assert_eq!(Ok(Some(2)), leap_month(2023));
        assert_eq!(Ok(29), leap_month_length(2023));
        assert_eq!(Ok(30), leap_month_length(2017));
        assert_eq!(Ok(30), month_length(2023, 12));
        assert_eq!(Ok(29), month_length(2024, 12));
        assert_eq!(Err(CalendarError::InvalidMonth { month: 13 }), month_length(2024, 13));
        assert_eq!(Err(CalendarError::InvalidMonth { month: 0 }), month_length(2024, 0));
        assert_eq!(Err(CalendarError::YearOutOfRange { year: 1899 }), year_length(1899));
        assert_eq!(Err(CalendarError::YearOutOfRange { year: 2101 }), leap_month(2101));
    }

    #[test]
    fn new_validates() {
        assert!(LunarDate::new(2023, Leap(2), 29).is_ok());
        assert!(LunarDate::new(2023, Common(12), 30).is_ok());
        for (month, day) in [(Leap(2), 30), (Leap(3), 1), (Common(1), 30), (Common(13), 1), (Common(1), 0)] {
            assert_eq!(
                Err(CalendarError::InvalidLunarDate { year: 2023, month, day }),
                LunarDate::new(2023, month, day)
            );
        }
    }

    #[test]
    fn month_starts() {
        let year = LunarYear::new(2023).unwrap();
        for (month, std) in [
            (Common(1), "2023-01-22"),
            (Common(2), "2023-02-20"),
            (Leap(2), "2023-03-22"),
            (Common(3), "2023-04-20"),
        ] {
            assert_eq!(Some(std.to_owned()), year.month_start(month).map(|d| d.iso_gregorian()));
        }
        assert_eq!(None, year.month_start(Leap(5)));
    }

    #[test]
    fn display() {
        let lunar = LunarDate::new(2023, Leap(2), 1).unwrap();
        assert_eq!("2023年閏二月初一", lunar.to_string());
        assert_eq!("癸卯", lunar.year_name());
        assert_eq!(LunarYear::new(2023).unwrap(), lunar.lunar_year());
        assert_eq!(Some(30), lunar.lunar_year().length_of(Common(12)));
    }

    #[test]
    fn year_sexagenary() {
        for (std, year) in [(60, -2697), (1, -2696), (17, 2000)] {
            assert_eq!(std, sexagenary_for_year(year));
        }
    }
}
