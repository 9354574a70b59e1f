use chrono::{DateTime, Datelike, TimeZone};
use rand::seq::SliceRandom;
use rand::Rng;
use std::str::FromStr;

type Phrasebook = &'static [(&'static str, &'static [&'static str])];

const HALLOWEEN: Phrasebook = &[
    ("sunny", &["clear skies for vampire sunbathing", "perfect weather for zombie tanning"]),
    ("cloudy", &["overcast with a chance of werewolf sightings", "gloomy atmosphere fit for a haunted house"]),
    ("rain", &["witch's brew falling from the sky", "ghostly tears showering the earth"]),
    ("windy", &["banshees howling through the air", "skeleton leaves dancing in the breeze"]),
    ("foggy", &["thick mist from the witch's cauldron", "spooky fog rolling in from the graveyard"]),
    ("stormy", &["thunder and lightning summoned by mad scientists", "perfect weather for raising the dead"]),
    ("cold", &["chilling touch of the undead", "frosty breath of ice zombies"]),
    ("hot", &["hellfire temperatures", "weather hot enough to melt a witch's face"]),
    ("clear", &["transparent as a ghost", "visibility clear enough to spot distant vampires"]),
];

const CHRISTMAS: Phrasebook = &[
    ("sunny", &["clear skies for Santa's sleigh ride", "perfect weather for snowmen to wear sunglasses"]),
    ("cloudy", &["sky full of cotton candy clouds", "overcast with a chance of falling snowflakes"]),
    ("rain", &["drizzle of liquid tinsel", "ornament-polishing shower"]),
    ("windy", &["North Pole breeze carrying jingle bells", "gusts of peppermint-scented air"]),
    ("foggy", &["thick mist from Mrs. Claus's cookie steam", "foggy enough to guide Rudolph's nose"]),
    ("stormy", &["snowglobe-shaking weather", "perfect blizzard for building an igloo"]),
    ("cold", &["Jack Frost nipping at your nose", "weather cold enough to freeze a sugar plum fairy"]),
    ("hot", &["unusually warm for the elves' liking", "Santa's \"beach vacation\" weather"]),
    ("clear", &["sky as clear as an icicle", "perfect visibility for spotting flying reindeer"]),
    ("snow", &["blanket of fresh Christmas powder", "flurry of Frosty's cousins falling"]),
];

/// Seasonal rewrite applied to the daily summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Plain,
    Halloween,
    Christmas,
    /// Halloween in October, Christmas in December, plain otherwise.
    Seasonal,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(Theme::Plain),
            "halloween" => Ok(Theme::Halloween),
            "christmas" => Ok(Theme::Christmas),
            "seasonal" | "auto" => Ok(Theme::Seasonal),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

impl Theme {
    /// The concrete theme in effect on `date`.
    pub fn for_date<Tz: TimeZone>(self, date: &DateTime<Tz>) -> Theme {
        match self {
            Theme::Seasonal => match date.month() {
                10 => Theme::Halloween,
                12 => Theme::Christmas,
                _ => Theme::Plain,
            },
            other => other,
        }
    }

    /// Rewrites `summary` in this theme's voice. `Plain` and `Seasonal` leave it
    /// untouched; resolve `Seasonal` with [`Theme::for_date`] first.
    pub fn apply<R: Rng + ?Sized>(self, summary: &str, rng: &mut R) -> String {
        match self {
            Theme::Halloween => themed(summary, HALLOWEEN, rng)
                .map(|parts| format!("Expect a day with {}", parts))
                .unwrap_or_else(|| "A mysteriously nondescript Halloween forecast".to_string()),
            Theme::Christmas => themed(summary, CHRISTMAS, rng)
                .map(|parts| format!("Ho ho ho! Expect a day with {}", parts))
                .unwrap_or_else(|| {
                    "Ho ho ho! A magically merry Christmas forecast, details known only to Santa"
                        .to_string()
                }),
            Theme::Plain | Theme::Seasonal => summary.to_string(),
        }
    }
}

fn themed<R: Rng + ?Sized>(summary: &str, phrasebook: Phrasebook, rng: &mut R) -> Option<String> {
    let summary = summary.to_lowercase();
    let parts: Vec<&str> = phrasebook
        .iter()
        .filter(|(condition, _)| summary.contains(condition))
        .filter_map(|(_, phrases)| phrases.choose(rng).copied())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" and "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn contains_any(text: &str, phrases: &[&str]) -> bool {
        let text = text.to_lowercase();
        phrases.iter().any(|p| text.contains(&p.to_lowercase()))
    }

    #[test]
    fn test_halloween_themes() {
        let cases: &[(&str, &[&str])] = &[
            ("Expect a sunny day", &["vampire", "zombie"]),
            ("Expect a day with rain", &["witch", "ghost"]),
            ("Expect a cloudy and windy day", &["werewolf", "haunted"]),
            ("Expect a day", &["mysteriously nondescript halloween forecast"]),
        ];

        for (input, expected) in cases {
            let result = Theme::Halloween.apply(input, &mut rng());
            assert!(contains_any(&result, expected), "{input:?} gave {result:?}");
        }
    }

    #[test]
    fn test_christmas_themes() {
        let cases: &[(&str, &[&str])] = &[
            ("Expect a sunny day", &["Santa", "snowmen"]),
            ("Expect a day with rain", &["tinsel", "ornament"]),
            ("Expect a snowy day", &["Christmas powder", "Frosty"]),
            ("Expect a day", &["magically merry Christmas forecast"]),
        ];

        for (input, expected) in cases {
            let result = Theme::Christmas.apply(input, &mut rng());
            assert!(result.starts_with("Ho ho ho!"), "{result:?}");
            assert!(contains_any(&result, expected), "{input:?} gave {result:?}");
        }
    }

    #[test]
    fn test_multiple_conditions_are_joined() {
        let result = Theme::Halloween.apply("Cloudy and windy", &mut rng());
        assert!(result.starts_with("Expect a day with "));
        assert!(result.contains(" and "));
        assert!(contains_any(&result, &["werewolf", "haunted"]));
        assert!(contains_any(&result, &["banshee", "skeleton"]));
    }

    #[test]
    fn test_phrase_choice_varies() {
        let mut rng = rng();
        let results: HashSet<String> = (0..100)
            .map(|_| Theme::Christmas.apply("Expect a sunny and snowy day", &mut rng))
            .collect();
        assert!(results.len() >= 2);
    }

    #[test]
    fn test_plain_theme_keeps_summary() {
        let summary = "There will be rain until morning";
        assert_eq!(Theme::Plain.apply(summary, &mut rng()), summary);
    }

    #[test]
    fn test_seasonal_follows_month() {
        let october = Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap();
        let december = Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        assert_eq!(Theme::Seasonal.for_date(&october), Theme::Halloween);
        assert_eq!(Theme::Seasonal.for_date(&december), Theme::Christmas);
        assert_eq!(Theme::Seasonal.for_date(&june), Theme::Plain);
        assert_eq!(Theme::Christmas.for_date(&june), Theme::Christmas);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("Halloween".parse::<Theme>(), Ok(Theme::Halloween));
        assert_eq!("".parse::<Theme>(), Ok(Theme::Plain));
        assert_eq!("auto".parse::<Theme>(), Ok(Theme::Seasonal));
        assert!("easter".parse::<Theme>().is_err());
    }
}
