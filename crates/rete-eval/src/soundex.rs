//! American Soundex phonetic encoding

/// Encode a string with American Soundex
///
/// The first letter is kept and the following consonants map to digits.
/// Adjacent letters with the same digit collapse into one, also across `H`
/// and `W`, while vowels (and `Y`) separate them. The code is padded with
/// zeros or truncated to four characters. Characters other than ASCII letters
/// are skipped. Returns `None` when the input has no letters.
pub fn soundex(value: &str) -> Option<String> {
    let mut letters = value
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());

    let first = letters.next()?;
    let mut code = String::with_capacity(4);
    code.push(first);

    let mut last = digit(first);
    for letter in letters {
        if code.len() == 4 {
            break;
        }
        match letter {
            'H' | 'W' => {}
            _ => {
                let current = digit(letter);
                match current {
                    Some(d) if current != last => code.push(d),
                    _ => {}
                }
                last = current;
            }
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}

fn digit(letter: char) -> Option<char> {
    match letter {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        // vowels and Y
        _ => None,
    }
}
