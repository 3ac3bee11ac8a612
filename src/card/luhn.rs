//! Luhn (mod 10) checksum

/// Luhn sum of a digit string, or `None` if it contains a non-digit.
///
/// Digits are walked right to left; every second one is doubled and folded
/// back into a single digit.
pub fn luhn_sum(number: &str) -> Option<u32> {
    number
        .bytes()
        .rev()
        .enumerate()
        .try_fold(0u32, |sum, (i, b)| {
            let digit = (b as char).to_digit(10)?;
            let value = if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            };
            Some(sum + value)
        })
}

/// Whether `number` is a non-empty digit string passing the Luhn check
pub fn luhn_valid(number: &str) -> bool {
    !number.is_empty() && luhn_sum(number).is_some_and(|sum| sum % 10 == 0)
}

/// Smallest digit that makes `partial` + digit Luhn-valid.
///
/// Tries 0 through 9 in order. For any digit string one of them always
/// passes; `None` only comes back when `partial` holds a non-digit.
pub fn check_digit(partial: &str) -> Option<char> {
    let mut candidate = String::with_capacity(partial.len() + 1);
    (b'0'..=b'9').map(char::from).find(|&d| {
        candidate.clear();
        candidate.push_str(partial);
        candidate.push(d);
        luhn_valid(&candidate)
    })
}
