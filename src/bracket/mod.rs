pub mod compass;
pub mod draw;
pub mod error;
pub mod groups;
pub mod knockout;
pub mod persistence;
pub mod progression;
pub mod seeding;
pub mod service;
pub mod standings;

use crate::bracket::compass::CompassDraw;
use crate::bracket::draw::Draw;
use crate::bracket::groups::GroupStage;

/// Output of one generator run, ready for a single persistence pass.
#[derive(Debug)]
pub enum GeneratedBracket {
    Knockout(Draw),
    Compass(CompassDraw),
    Groups(GroupStage),
}

impl GeneratedBracket {
    pub fn draw(&self) -> &Draw {
        match self {
            GeneratedBracket::Knockout(draw) => draw,
            GeneratedBracket::Compass(compass) => &compass.draw,
            GeneratedBracket::Groups(stage) => &stage.draw,
        }
    }
}
