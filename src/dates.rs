use chrono::{Datelike, NaiveDate};

/// Display format for a resume date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
	/// "May 2023" / "Mai 2023"
	MonthYear,
	/// "2023"
	Year,
	/// "15 May 2023"
	DayMonthYear,
}

/// Target language for month names and the "present" token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
	En,
	De,
}

const MONTHS_EN: [&str; 12] = [
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_DE: [&str; 12] = [
	"Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];

impl Locale {
	pub fn from_code(code: &str) -> Self {
		match code.to_lowercase().as_str() {
			"de" | "german" | "deutsch" => Locale::De,
			_ => Locale::En,
		}
	}

	pub fn month_abbr(&self, month: u32) -> &'static str {
		let idx = (month.clamp(1, 12) - 1) as usize;
		match self {
			Locale::En => MONTHS_EN[idx],
			Locale::De => MONTHS_DE[idx],
		}
	}

	/// The localized word for an ongoing date.
	pub fn present_token(&self) -> &'static str {
		match self {
			Locale::En => "Present",
			Locale::De => "Heute",
		}
	}
}

fn is_present_sentinel(value: &str) -> bool {
	matches!(
		value.trim().to_lowercase().as_str(),
		"" | "present" | "current" | "heute"
	)
}

/// Parse a date string against the accepted shapes, most specific first:
/// full date, year-month, year only. Missing components default to the
/// first day/month.
fn parse_date(value: &str) -> Option<NaiveDate> {
	let value = value.trim();

	if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
		return Some(date);
	}

	if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-1", value), "%Y-%m-%d") {
		return Some(date);
	}

	if value.len() == 4 {
		if let Ok(year) = value.parse::<i32>() {
			return NaiveDate::from_ymd_opt(year, 1, 1);
		}
	}

	None
}

/// Format a date string for display.
///
/// `None`, empty strings and the present sentinels ("Present", "Current",
/// the locale token) all map to the locale's present token regardless of
/// format. A string that matches none of the accepted shapes is returned
/// unchanged; a bad date never fails a build.
pub fn format_date(value: Option<&str>, format: DateFormat, locale: Locale) -> String {
	let raw = match value {
		Some(v) if !is_present_sentinel(v) => v,
		_ => return locale.present_token().to_string(),
	};

	let date = match parse_date(raw) {
		Some(date) => date,
		None => return raw.to_string(),
	};

	match format {
		DateFormat::MonthYear => {
			format!("{} {}", locale.month_abbr(date.month()), date.year())
		}
		DateFormat::Year => date.year().to_string(),
		DateFormat::DayMonthYear => format!(
			"{} {} {}",
			date.day(),
			locale.month_abbr(date.month()),
			date.year()
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_present_sentinels() {
		for format in [DateFormat::MonthYear, DateFormat::Year, DateFormat::DayMonthYear] {
			assert_eq!(format_date(None, format, Locale::En), "Present");
			assert_eq!(format_date(Some(""), format, Locale::En), "Present");
			assert_eq!(format_date(Some("Present"), format, Locale::En), "Present");
			assert_eq!(format_date(Some("Current"), format, Locale::En), "Present");
			assert_eq!(format_date(Some("Present"), format, Locale::De), "Heute");
			assert_eq!(format_date(Some("heute"), format, Locale::De), "Heute");
		}
	}

	#[test]
	fn test_month_year() {
		assert_eq!(
			format_date(Some("2023-05"), DateFormat::MonthYear, Locale::En),
			"May 2023"
		);
		assert_eq!(
			format_date(Some("2023-05"), DateFormat::MonthYear, Locale::De),
			"Mai 2023"
		);
		assert_eq!(
			format_date(Some("2021-10-03"), DateFormat::MonthYear, Locale::De),
			"Okt 2021"
		);
	}

	#[test]
	fn test_year_only() {
		assert_eq!(format_date(Some("2023-05"), DateFormat::Year, Locale::En), "2023");
		assert_eq!(format_date(Some("2023"), DateFormat::Year, Locale::De), "2023");
		assert_eq!(
			format_date(Some("2023"), DateFormat::MonthYear, Locale::En),
			"Jan 2023"
		);
	}

	#[test]
	fn test_day_month_year() {
		assert_eq!(
			format_date(Some("2023-05-15"), DateFormat::DayMonthYear, Locale::En),
			"15 May 2023"
		);
		assert_eq!(
			format_date(Some("2024-03-01"), DateFormat::DayMonthYear, Locale::De),
			"1 Mär 2024"
		);
	}

	#[test]
	fn test_unparseable_passes_through() {
		for format in [DateFormat::MonthYear, DateFormat::Year, DateFormat::DayMonthYear] {
			assert_eq!(
				format_date(Some("sometime last year"), format, Locale::En),
				"sometime last year"
			);
			assert_eq!(format_date(Some("05/2023"), format, Locale::De), "05/2023");
		}
	}
}
