//! Advisory messages for an hour's conditions, and the display text around them.
//!
//! Choosing the advisory and rendering its text are separate steps: `advise`
//! returns an `Advisory`, and a `Language` turns it (and every other `Label`
//! shown to the user) into display text.

/// Advisory categories, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    /// Feels-like temperature above 31°C
    DangerousHeat,
    /// Precipitation probability above 50%
    Rain,
    /// 15-25°C and precipitation below 30%
    Ideal,
    /// Above 25°C
    WarmAdvice,
    /// Below 10°C
    ColdAdvice,
    /// Nothing notable
    Neutral,
}

impl Advisory {
    /// Returns a slice containing all advisory variants in priority order.
    pub fn all() -> &'static [Advisory] {
        &[
            Advisory::DangerousHeat,
            Advisory::Rain,
            Advisory::Ideal,
            Advisory::WarmAdvice,
            Advisory::ColdAdvice,
            Advisory::Neutral,
        ]
    }

    /// Whether the advisory argues against exercising outdoors
    pub fn is_warning(&self) -> bool {
        matches!(self, Advisory::DangerousHeat | Advisory::Rain)
    }
}

/// Picks the single advisory for the given conditions. First match wins.
pub fn advise(temperature: f64, precipitation_probability: u8, apparent_temperature: f64) -> Advisory {
    if apparent_temperature > 31.0 {
        Advisory::DangerousHeat
    } else if precipitation_probability > 50 {
        Advisory::Rain
    } else if (15.0..=25.0).contains(&temperature) && precipitation_probability < 30 {
        Advisory::Ideal
    } else if temperature > 25.0 {
        Advisory::WarmAdvice
    } else if temperature < 10.0 {
        Advisory::ColdAdvice
    } else {
        Advisory::Neutral
    }
}

/// Fixed pieces of interface text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    BestTimes,
    AllHours,
    ScoreByHour,
    Time,
    Score,
    Temperature,
    FeelsLike,
    Rain,
    Humidity,
    Wind,
    Heat,
    Cold,
    NoDeductions,
    Today,
    TodayAndTomorrow,
    Updated,
    Loading,
    LoadFailed,
    KeyHints,
    RetryHints,
}

impl Label {
    pub fn all() -> &'static [Label] {
        &[
            Label::BestTimes,
            Label::AllHours,
            Label::ScoreByHour,
            Label::Time,
            Label::Score,
            Label::Temperature,
            Label::FeelsLike,
            Label::Rain,
            Label::Humidity,
            Label::Wind,
            Label::Heat,
            Label::Cold,
            Label::NoDeductions,
            Label::Today,
            Label::TodayAndTomorrow,
            Label::Updated,
            Label::Loading,
            Label::LoadFailed,
            Label::KeyHints,
            Label::RetryHints,
        ]
    }
}

/// Display language for advisory and status text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// 日本語
    #[default]
    Japanese,
    English,
}

impl Language {
    /// Parses user input into a Language.
    ///
    /// Matching is case-insensitive: "ja" | "jp" | "japanese" and
    /// "en" | "english". Returns `None` for anything else.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Language> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Some(Language::Japanese),
            "en" | "english" => Some(Language::English),
            _ => None,
        }
    }

    /// Short language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Japanese => "ja",
            Language::English => "en",
        }
    }

    /// The other supported language
    pub fn toggled(&self) -> Language {
        match self {
            Language::Japanese => Language::English,
            Language::English => Language::Japanese,
        }
    }

    /// Text shown for an advisory
    pub fn advisory(&self, advisory: Advisory) -> &'static str {
        match (self, advisory) {
            (Language::Japanese, Advisory::DangerousHeat) => {
                "熱中症の危険があります。屋外での運動は控えましょう。"
            }
            (Language::Japanese, Advisory::Rain) => "雨の可能性が高いです。屋内での運動がおすすめです。",
            (Language::Japanese, Advisory::Ideal) => "運動にぴったりのコンディションです！",
            (Language::Japanese, Advisory::WarmAdvice) => "気温が高めです。こまめに水分をとりましょう。",
            (Language::Japanese, Advisory::ColdAdvice) => "気温が低めです。しっかりウォームアップしましょう。",
            (Language::Japanese, Advisory::Neutral) => "無理のないペースで運動を楽しみましょう。",
            (Language::English, Advisory::DangerousHeat) => {
                "Risk of heatstroke. Avoid exercising outdoors."
            }
            (Language::English, Advisory::Rain) => "Rain is likely. Consider exercising indoors.",
            (Language::English, Advisory::Ideal) => "Ideal conditions for exercise!",
            (Language::English, Advisory::WarmAdvice) => "It's warm. Drink water regularly.",
            (Language::English, Advisory::ColdAdvice) => "It's cold. Warm up thoroughly first.",
            (Language::English, Advisory::Neutral) => "Enjoy your workout at a comfortable pace.",
        }
    }

    /// Text for a piece of the interface
    pub fn label(&self, label: Label) -> &'static str {
        match self {
            Language::Japanese => match label {
                Label::BestTimes => "おすすめの時間帯",
                Label::AllHours => "1時間ごとの予報",
                Label::ScoreByHour => "時間ごとのスコア",
                Label::Time => "時刻",
                Label::Score => "スコア",
                Label::Temperature => "気温",
                Label::FeelsLike => "体感",
                Label::Rain => "降水",
                Label::Humidity => "湿度",
                Label::Wind => "風速",
                Label::Heat => "暑さ",
                Label::Cold => "寒さ",
                Label::NoDeductions => "減点なし",
                Label::Today => "今日",
                Label::TodayAndTomorrow => "今日と明日",
                Label::Updated => "更新",
                Label::Loading => "予報を取得しています...",
                Label::LoadFailed => "予報を取得できませんでした",
                Label::KeyHints => "w 期間  l 言語  r 更新  ? ヘルプ  q 終了",
                Label::RetryHints => "r 再試行  q 終了",
            },
            Language::English => match label {
                Label::BestTimes => "Best times",
                Label::AllHours => "All hours",
                Label::ScoreByHour => "Score by hour",
                Label::Time => "Time",
                Label::Score => "Score",
                Label::Temperature => "Temp",
                Label::FeelsLike => "Feels",
                Label::Rain => "Rain",
                Label::Humidity => "Hum",
                Label::Wind => "Wind",
                Label::Heat => "Heat",
                Label::Cold => "Cold",
                Label::NoDeductions => "No deductions",
                Label::Today => "Today",
                Label::TodayAndTomorrow => "Today + Tomorrow",
                Label::Updated => "updated",
                Label::Loading => "Loading forecast...",
                Label::LoadFailed => "Could not load the forecast",
                Label::KeyHints => "w window  l language  r refresh  ? help  q quit",
                Label::RetryHints => "r retry  q quit",
            },
        }
    }

    /// "as of" phrase around a formatted time
    pub fn as_of(&self, time: &str) -> String {
        match self {
            Language::Japanese => format!("{} 時点", time),
            Language::English => format!("as of {}", time),
        }
    }

    /// Text shown when the forecast has no hours in the window
    pub fn no_data(&self) -> &'static str {
        match self {
            Language::Japanese => "予報データがありません。",
            Language::English => "No forecast data available.",
        }
    }

    /// Text shown when no upcoming hour can be recommended
    pub fn no_suitable_time(&self) -> &'static str {
        match self {
            Language::Japanese => "おすすめできる時間帯が見つかりませんでした。",
            Language::English => "No suitable time found.",
        }
    }
}
