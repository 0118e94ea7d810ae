//! As-you-type formatting for masked inputs.

fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Postal code mask `00000-000`: digits only, at most 8, hyphen after the fifth.
pub fn format_postal_code(input: &str) -> String {
    let d = digits(input, 8);
    if d.len() > 5 {
        format!("{}-{}", &d[..5], &d[5..])
    } else {
        d
    }
}

/// Expiry mask `MM/YY`: digits only, at most 4, slash after the second.
pub fn format_expiry(input: &str) -> String {
    let d = digits(input, 4);
    if d.len() >= 3 {
        format!("{}/{}", &d[..2], &d[2..])
    } else {
        d
    }
}

/// The digits of a postal code, for the lookup service.
pub fn postal_code_digits(input: &str) -> String {
    digits(input, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_gets_hyphen_after_five_digits() {
        assert_eq!(format_postal_code("01310"), "01310");
        assert_eq!(format_postal_code("013101"), "01310-1");
        assert_eq!(format_postal_code("01310100"), "01310-100");
    }

    #[test]
    fn postal_code_drops_non_digits_and_extra_digits() {
        assert_eq!(format_postal_code("01.310-100 "), "01310-100");
        assert_eq!(format_postal_code("0131010099"), "01310-100");
        assert_eq!(format_postal_code("abc"), "");
    }

    #[test]
    fn expiry_gets_slash_after_month() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12");
        assert_eq!(format_expiry("122"), "12/2");
        assert_eq!(format_expiry("1225"), "12/25");
        assert_eq!(format_expiry("12/2599"), "12/25");
    }

    #[test]
    fn postal_digits_strip_mask() {
        assert_eq!(postal_code_digits("01310-100"), "01310100");
    }
}
