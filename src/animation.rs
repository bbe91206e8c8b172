use cgmath::Vector4;

/// Red channel of a color bouncing between 0 and 1.
#[derive(Debug, Clone)]
pub struct ColorPulse {
    color: Vector4<f32>,
    step: f32,
    increment: f32,
}

impl ColorPulse {
    pub fn new(color: Vector4<f32>, step: f32) -> Self {
        Self {
            color,
            step,
            increment: step,
        }
    }

    pub fn color(&self) -> Vector4<f32> {
        self.color
    }

    pub fn advance(&mut self) {
        if self.color.x >= 1.0 {
            self.increment = -self.step;
        } else if self.color.x <= 0.0 {
            self.increment = self.step;
        }

        self.color.x = (self.color.x + self.increment).clamp(0.0, 1.0);
    }
}
