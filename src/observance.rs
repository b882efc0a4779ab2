//! Ceremonial observances attached to lunar dates.
//!
//! A fixed, bilingual list of rules ([`STANDARD_RULES`]) is matched against a
//! [`LunarDate`]; a synthetic year-end eve rule is evaluated last. Extra rules
//! loaded from configuration slot in between, see [`RuleSet`].

use std::borrow::Cow;

use serde::Deserialize;

use crate::chinese::{LunarDate, Month};

/// Kind of observance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// New moon (day 1) and full moon (day 15) markers.
    MoonPhase,
    Ceremony,
    /// Birth anniversary of a master.
    Birth,
    /// Passing anniversary of a master.
    Passing,
    Other,
}

impl Category {
    /// Short lowercase name, used in event identifiers.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::MoonPhase => "moon",
            Category::Ceremony => "ceremony",
            Category::Birth => "birth",
            Category::Passing => "passing",
            Category::Other => "other",
        }
    }

    /// Guesses a category from keywords in a rule title.
    ///
    /// Compatibility shim for legacy rule data that carries no category. The
    /// standard rules are all tagged explicitly and never go through here.
    ///
    /// ```
    /// use nongli::observance::Category;
    ///
    /// assert_eq!(Category::Birth, Category::infer_from_title("Natalicio de Confucio"));
    /// assert_eq!(Category::Other, Category::infer_from_title("Luna Nueva"));
    /// ```
    pub fn infer_from_title(title: &str) -> Self {
        if title.contains("Ceremonia") {
            Category::Ceremony
        } else if title.contains("Natalicio") || title.contains("Nacimiento") {
            Category::Birth
        } else if title.contains("Iluminación") || title.contains("Fallecimiento") {
            Category::Passing
        } else {
            Category::Other
        }
    }
}

/// Lunar day a rule fires on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Trigger {
    /// Given day of every month, leap months included.
    EveryMonth { day: u32 },
    /// Given day of a given common month. Leap duplicates of that month never
    /// match, so the observance occurs once per lunar year.
    Fixed { month: u32, day: u32 },
}

impl Trigger {
    pub fn matches(&self, lunar: &LunarDate) -> bool {
        match *self {
            Trigger::EveryMonth { day } => lunar.day() == day,
            Trigger::Fixed { month, day } => {
                lunar.month() == Month::Common(month) && lunar.day() == day
            }
        }
    }
}

/// A rule attaching an observance to a lunar day.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ObservanceRule {
    pub trigger: Trigger,
    /// Spanish title.
    pub title: Cow<'static, str>,
    /// Chinese name, if any.
    pub local_title: Option<Cow<'static, str>>,
    pub is_major: bool,
    pub category: Category,
}

const fn rule(
    trigger: Trigger,
    title: &'static str,
    local_title: &'static str,
    is_major: bool,
    category: Category,
) -> ObservanceRule {
    ObservanceRule {
        trigger,
        title: Cow::Borrowed(title),
        local_title: Some(Cow::Borrowed(local_title)),
        is_major,
        category,
    }
}

const fn every_month(day: u32) -> Trigger {
    Trigger::EveryMonth { day }
}

const fn fixed(month: u32, day: u32) -> Trigger {
    Trigger::Fixed { month, day }
}

/// The standard rules, in resolution order.
pub static STANDARD_RULES: &[ObservanceRule] = &[
    rule(every_month(1), "Luna Nueva", "初一", false, Category::MoonPhase),
    rule(every_month(15), "Luna Llena", "十五", false, Category::MoonPhase),
    rule(fixed(1, 1), "Año Nuevo Chino", "大年初一", true, Category::Ceremony),
    rule(fixed(3, 15), "Ceremonia de Primavera", "春季大典", true, Category::Ceremony),
    rule(fixed(6, 15), "Ceremonia de Verano", "夏季大典", true, Category::Ceremony),
    rule(fixed(9, 15), "Ceremonia de Otoño", "秋季大典", true, Category::Ceremony),
    rule(fixed(11, 15), "Ceremonia de Invierno", "冬季大典", true, Category::Ceremony),
    rule(fixed(5, 5), "Festival del Bote del Dragón", "端午節", true, Category::Ceremony),
    rule(fixed(8, 15), "Festival de Medio Otoño", "中秋節", true, Category::Ceremony),
    rule(
        fixed(4, 24),
        "Nacimiento de LAO TZU SHI 3 reverencias de 9 toques",
        "老祖師聖誕 三拜九叩",
        true,
        Category::Birth,
    ),
    rule(
        fixed(2, 2),
        "Fallecimiento de LAO TZU SHI 3 reverencias de 9 toques",
        "老祖師圓寂 三拜九叩",
        true,
        Category::Passing,
    ),
    rule(
        fixed(7, 19),
        "Nacimiento de TIEN RAN EN SHI U KO SHOU",
        "天然恩師聖誕 五叩首",
        true,
        Category::Birth,
    ),
    rule(
        fixed(8, 15),
        "Conmemoración de Fallecimiento de Maestro SHI TSUN U KO SHOU",
        "追念先師圓寂週年之恩 五叩首",
        true,
        Category::Passing,
    ),
    rule(
        fixed(8, 28),
        "Nacimiento de TZI MU TA REN U KO SHOU",
        "慈母大人聖誕 五叩首",
        true,
        Category::Birth,
    ),
    rule(
        fixed(2, 23),
        "Fallecimiento de SHI MU LAO TA REN U KO SHOU",
        "師母老大人圓寂 五叩首",
        true,
        Category::Passing,
    ),
];

/// Which rule produced an [`Observance`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Origin {
    /// Index into [`STANDARD_RULES`].
    Standard(usize),
    /// Index into the configured extra rules.
    Extra(usize),
    YearEndEve,
}

impl Origin {
    /// Stable short name, unique per rule within a rule set.
    ///
    /// ```
    /// use nongli::observance::Origin;
    ///
    /// assert_eq!("r02", Origin::Standard(2).slug());
    /// assert_eq!("eve", Origin::YearEndEve.slug());
    /// ```
    pub fn slug(&self) -> String {
        match self {
            Origin::Standard(i) => format!("r{i:02}"),
            Origin::Extra(i) => format!("x{i:02}"),
            Origin::YearEndEve => "eve".to_owned(),
        }
    }
}

/// An observance resolved for one day.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Observance {
    pub title: Cow<'static, str>,
    pub local_title: Option<Cow<'static, str>>,
    pub is_major: bool,
    pub category: Category,
    pub origin: Origin,
}

impl Observance {
    /// Last day of the twelfth common month, whether it has 29 or 30 days.
    fn year_end_eve() -> Self {
        Self {
            title: Cow::Borrowed("Nochevieja China"),
            local_title: Some(Cow::Borrowed("除夕")),
            is_major: true,
            category: Category::Ceremony,
            origin: Origin::YearEndEve,
        }
    }

    fn from_rule(rule: &ObservanceRule, origin: Origin) -> Self {
        Self {
            title: rule.title.clone(),
            local_title: rule.local_title.clone(),
            is_major: rule.is_major,
            category: rule.category,
            origin,
        }
    }

    /// Title followed by the local name when present.
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::LunarDate;
    /// use nongli::observance::resolve;
    ///
    /// let lunar = LunarDate::from_date(Date::from_gregorian(2024, 6, 10).unwrap()).unwrap();
    /// let found = resolve(&lunar);
    /// assert_eq!("Festival del Bote del Dragón 端午節", found[0].summary());
    /// ```
    pub fn summary(&self) -> String {
        match &self.local_title {
            Some(local) => format!("{} {}", self.title, local),
            None => self.title.to_string(),
        }
    }
}

/// Standard rules plus any rules added by configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    extra: Vec<ObservanceRule>,
}

impl RuleSet {
    /// Only the standard rules.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Standard rules followed by `extra`, in order.
    pub fn with_extra(extra: Vec<ObservanceRule>) -> Self {
        Self { extra }
    }

    /// All rules in resolution order, excluding the synthetic eve.
    pub fn rules(&self) -> impl Iterator<Item = (Origin, &ObservanceRule)> {
        let standard = STANDARD_RULES
            .iter()
            .enumerate()
            .map(|(i, r)| (Origin::Standard(i), r));
        let extra = self
            .extra
            .iter()
            .enumerate()
            .map(|(i, r)| (Origin::Extra(i), r));
        standard.chain(extra)
    }

    /// Resolves the observances of one lunar day.
    ///
    /// Rules are matched in declaration order, the year-end eve last. An
    /// unmatched day gives an empty vector.
    pub fn resolve(&self, lunar: &LunarDate) -> Vec<Observance> {
        let mut found: Vec<_> = self
            .rules()
            .filter(|(_, rule)| rule.trigger.matches(lunar))
            .map(|(origin, rule)| Observance::from_rule(rule, origin))
            .collect();

        let twelfth = Month::Common(12);
        if lunar.month() == twelfth && lunar.lunar_year().length_of(twelfth) == Some(lunar.day()) {
            found.push(Observance::year_end_eve());
        }
        found
    }
}

/// Resolves `lunar` against the standard rules.
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::LunarDate;
/// use nongli::observance::resolve;
///
/// let lunar = LunarDate::from_date(Date::from_gregorian(2023, 1, 22).unwrap()).unwrap();
/// let titles: Vec<_> = resolve(&lunar).into_iter().map(|o| o.title).collect();
/// assert_eq!(vec!["Luna Nueva", "Año Nuevo Chino"], titles);
/// ```
pub fn resolve(lunar: &LunarDate) -> Vec<Observance> {
    RuleSet::standard().resolve(lunar)
}

/// Indicator shown on a calendar grid cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DayMarker {
    Major,
    MoonPhase,
    Other,
}

impl DayMarker {
    /// Major observances win over moon phases, which win over the rest.
    /// `None` for a day without observances.
    pub fn for_observances(found: &[Observance]) -> Option<Self> {
        if found.is_empty() {
            None
        } else if found.iter().any(|o| o.is_major) {
            Some(DayMarker::Major)
        } else if found.iter().any(|o| o.category == Category::MoonPhase) {
            Some(DayMarker::MoonPhase)
        } else {
            Some(DayMarker::Other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::Month::*;

    fn titles(found: &[Observance]) -> Vec<&str> {
        found.iter().map(|o| &*o.title).collect()
    }

    #[test]
    fn standard_rules_are_tagged() {
        assert_eq!(15, STANDARD_RULES.len());
        assert!(STANDARD_RULES.iter().all(|r| r.local_title.is_some()));
        let moon = STANDARD_RULES
            .iter()
            .filter(|r| r.category == Category::MoonPhase)
            .count();
        assert_eq!(2, moon);
    }

    #[test]
    fn new_moon_and_full_moon_in_leap_months() {
        let first = LunarDate::new(2023, Leap(2), 1).unwrap();
        assert_eq!(vec!["Luna Nueva"], titles(&resolve(&first)));
        let full = LunarDate::new(2023, Leap(2), 15).unwrap();
        assert_eq!(vec!["Luna Llena"], titles(&resolve(&full)));
    }

    #[test]
    fn fixed_rules_skip_leap_duplicates() {
        let common = LunarDate::new(2023, Common(2), 23).unwrap();
        assert_eq!(
            vec!["Fallecimiento de SHI MU LAO TA REN U KO SHOU"],
            titles(&resolve(&common))
        );
        let leap = LunarDate::new(2023, Leap(2), 23).unwrap();
        assert!(resolve(&leap).is_empty());
        let leap = LunarDate::new(2023, Leap(2), 2).unwrap();
        assert!(resolve(&leap).is_empty());
    }

    #[test]
    fn mid_autumn_keeps_declaration_order() {
        let lunar = LunarDate::new(2024, Common(8), 15).unwrap();
        let found = resolve(&lunar);
        assert_eq!(
            vec![
                "Luna Llena",
                "Festival de Medio Otoño",
                "Conmemoración de Fallecimiento de Maestro SHI TSUN U KO SHOU",
            ],
            titles(&found)
        );
        assert_eq!(
            vec![Origin::Standard(1), Origin::Standard(8), Origin::Standard(12)],
            found.iter().map(|o| o.origin).collect::<Vec<_>>()
        );
    }

    #[test]
    fn year_end_eve_on_short_and_long_twelfth_month() {
        // 2023 has a 30-day twelfth month, 2024 a 29-day one.
        let long = LunarDate::new(2023, Common(12), 30).unwrap();
        let found = resolve(&long);
        assert_eq!(vec!["Nochevieja China"], titles(&found));
        assert_eq!(Origin::YearEndEve, found[0].origin);
        assert!(found[0].is_major);

        let short = LunarDate::new(2024, Common(12), 29).unwrap();
        assert_eq!(vec!["Nochevieja China"], titles(&resolve(&short)));

        let not_last = LunarDate::new(2023, Common(12), 29).unwrap();
        assert!(resolve(&not_last).is_empty());
    }

    #[test]
    fn unmatched_day_is_empty() {
        let lunar = LunarDate::new(2024, Common(6), 7).unwrap();
        assert!(resolve(&lunar).is_empty());
        assert_eq!(None, DayMarker::for_observances(&[]));
    }

    #[test]
    fn extra_rules_resolve_before_eve() {
        let extra = ObservanceRule {
            trigger: Trigger::Fixed { month: 12, day: 30 },
            title: Cow::Owned("Limpieza del Templo".to_owned()),
            local_title: None,
            is_major: false,
            category: Category::Other,
        };
        let rules = RuleSet::with_extra(vec![extra]);
        let lunar = LunarDate::new(2023, Common(12), 30).unwrap();
        let found = rules.resolve(&lunar);
        assert_eq!(vec!["Limpieza del Templo", "Nochevieja China"], titles(&found));
        assert_eq!(Origin::Extra(0), found[0].origin);
        assert_eq!("Limpieza del Templo", found[0].summary());
    }

    #[test]
    fn day_markers() {
        let moon = resolve(&LunarDate::new(2024, Common(6), 1).unwrap());
        assert_eq!(Some(DayMarker::MoonPhase), DayMarker::for_observances(&moon));
        let major = resolve(&LunarDate::new(2024, Common(1), 1).unwrap());
        assert_eq!(Some(DayMarker::Major), DayMarker::for_observances(&major));
    }

    #[test]
    fn legacy_category_inference() {
        for (std, title) in [
            (Category::Ceremony, "Ceremonia de Primavera"),
            (Category::Birth, "Nacimiento de TZI MU TA REN"),
            (Category::Passing, "Iluminación del Maestro"),
            (Category::Passing, "Fallecimiento de LAO TZU SHI"),
            (Category::Other, "Festival de Medio Otoño"),
        ] {
            assert_eq!(std, Category::infer_from_title(title), "{title}");
        }
    }
}
