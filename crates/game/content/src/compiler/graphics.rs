use puzzle_core::{Color, Logger, ObjectGraphics};

use crate::parser::ObjectBlock;

/// Resolves an object's colors and sprite.
///
/// Problems are reported as warnings and rendered transparent; graphics never
/// fail a compile.
pub(crate) fn compile_graphics(block: &ObjectBlock, logger: &dyn Logger) -> ObjectGraphics {
    let palette: Vec<Option<Color>> = block
        .colors
        .iter()
        .map(|name| {
            if name.eq_ignore_ascii_case("transparent") {
                return None;
            }
            let color = Color::from_hex(name).or_else(|| Color::named(name));
            if color.is_none() {
                logger.warning(&format!(
                    "line {}: unknown color `{name}` for `{}`",
                    block.line, block.name
                ));
            }
            color
        })
        .collect();

    let height = block.sprite.len();
    let width = block
        .sprite
        .iter()
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0);

    let mut pixels = Vec::with_capacity(width * height);
    for row in &block.sprite {
        let mut count = 0;
        for ch in row.chars() {
            let index = ch.to_digit(10).map(|digit| digit as usize);
            let pixel = match index {
                Some(index) if index < palette.len() => Some(index),
                Some(index) => {
                    logger.warning(&format!(
                        "line {}: sprite of `{}` uses color {index} but only {} are defined",
                        block.line,
                        block.name,
                        palette.len()
                    ));
                    None
                }
                None => None,
            };
            pixels.push(pixel);
            count += 1;
        }
        pixels.extend(std::iter::repeat_n(None, width - count));
    }

    ObjectGraphics {
        palette,
        width,
        height,
        pixels,
    }
}
