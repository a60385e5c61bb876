use std::ops;

use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub rgb: Vec3,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Color {
        Color {
            rgb: Vec3 { x: r, y: g, z: b },
        }
    }

    pub fn from_rgb(rgb: Vec3) -> Color {
        Color { rgb }
    }

    pub fn r(&self) -> f32 {
        self.rgb.x
    }

    pub fn g(&self) -> f32 {
        self.rgb.y
    }

    pub fn b(&self) -> f32 {
        self.rgb.z
    }

    pub fn lerp(bottom: &Color, top: &Color, t: f32) -> Color {
        Color::from_rgb(lerp(bottom.rgb, top.rgb, t))
    }

    /// Channel-wise product, used to attenuate light by an albedo.
    pub fn attenuate(&self, attenuation: &Color) -> Color {
        Color::from_rgb(self.rgb.mul_elements(&attenuation.rgb))
    }

    pub fn to_argb(&self) -> u32 {
        self.to_argb_with_alpha(0xFF)
    }

    pub fn to_argb_with_alpha(&self, alpha: u8) -> u32 {
        let red = to_color_component(self.r());
        let green = to_color_component(self.g());
        let blue = to_color_component(self.b());

        (u32::from(alpha) << 24) |
        (u32::from(red) << 16) |
        (u32::from(green) << 8) |
        u32::from(blue)
    }
}

fn to_color_component(value: f32) -> u8 {
    (255.0 * value.max(0.0).min(1.0)) as u8
}

impl ops::Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Color {
        Color::from_rgb(self.rgb * rhs)
    }
}
