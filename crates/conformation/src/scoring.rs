//! Step tables that turn a raw geometric value into a 1-9 score.
//!
//! Breakpoints are in raw pixel space (or degrees for angles). They are part
//! of the scoring contract: changing one changes published scores.

use crate::types::Score;

const fn s(value: u8) -> Score {
    Score::saturating(value)
}

/// A fixed scoring table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreTable {
    /// Larger is better: first step whose threshold is `<=` the value
    AtLeast {
        steps: &'static [(f64, Score)],
        floor: Score,
    },
    /// Closer to zero is better, sign ignored: first step whose threshold is
    /// `>=` the absolute value
    AbsAtMost {
        steps: &'static [(f64, Score)],
        floor: Score,
    },
    /// Sweet spot: nested inclusive intervals, first containing band wins
    Bands {
        bands: &'static [(f64, f64, Score)],
        outside: Score,
    },
}

impl ScoreTable {
    pub fn score(&self, value: f64) -> Score {
        match *self {
            ScoreTable::AtLeast { steps, floor } => steps
                .iter()
                .find(|(threshold, _)| value >= *threshold)
                .map_or(floor, |(_, score)| *score),
            ScoreTable::AbsAtMost { steps, floor } => {
                let magnitude = value.abs();
                steps
                    .iter()
                    .find(|(threshold, _)| magnitude <= *threshold)
                    .map_or(floor, |(_, score)| *score)
            }
            ScoreTable::Bands { bands, outside } => bands
                .iter()
                .find(|(low, high, _)| (*low..=*high).contains(&value))
                .map_or(outside, |(_, _, score)| *score),
        }
    }
}

pub const BODY_LENGTH: ScoreTable = ScoreTable::AtLeast {
    steps: &[(350.0, s(9)), (320.0, s(8)), (290.0, s(7)), (260.0, s(6)), (230.0, s(5))],
    floor: s(4),
};

pub const STATURE: ScoreTable = ScoreTable::AtLeast {
    steps: &[(400.0, s(9)), (370.0, s(8)), (340.0, s(7)), (310.0, s(6)), (280.0, s(5))],
    floor: s(4),
};

pub const HEART_GIRTH: ScoreTable = ScoreTable::AtLeast {
    steps: &[(500.0, s(9)), (460.0, s(8)), (420.0, s(7)), (380.0, s(6)), (340.0, s(5))],
    floor: s(4),
};

pub const BODY_DEPTH: ScoreTable = ScoreTable::AtLeast {
    steps: &[(180.0, s(9)), (160.0, s(8)), (140.0, s(7)), (120.0, s(6)), (100.0, s(5))],
    floor: s(4),
};

/// Vertical drop from spine to hip bone, in pixels
pub const RUMP_ANGLE: ScoreTable = ScoreTable::Bands {
    bands: &[(25.0, 35.0, s(9)), (20.0, 40.0, s(8)), (15.0, 45.0, s(7)), (10.0, 50.0, s(6))],
    outside: s(5),
};

pub const REAR_LEGS_SET: ScoreTable = ScoreTable::Bands {
    bands: &[(160.0, 170.0, s(9)), (155.0, 175.0, s(8)), (150.0, 180.0, s(7))],
    outside: s(6),
};

pub const FOOT_ANGLE: ScoreTable = ScoreTable::Bands {
    bands: &[(45.0, 50.0, s(9)), (42.0, 53.0, s(8)), (40.0, 55.0, s(7)), (38.0, 58.0, s(6))],
    outside: s(5),
};

pub const RUMP_WIDTH: ScoreTable = ScoreTable::AtLeast {
    steps: &[
        (280.0, s(9)),
        (260.0, s(8)),
        (240.0, s(7)),
        (220.0, s(6)),
        (200.0, s(5)),
        (180.0, s(4)),
        (160.0, s(3)),
        (140.0, s(2)),
    ],
    floor: s(1),
};

/// Hoof span minus hock span; toe-in and toe-out score alike
pub const REAR_LEGS_REAR_VIEW: ScoreTable = ScoreTable::AbsAtMost {
    steps: &[
        (5.0, s(9)),
        (10.0, s(8)),
        (15.0, s(7)),
        (20.0, s(6)),
        (30.0, s(5)),
        (40.0, s(4)),
        (50.0, s(3)),
        (60.0, s(2)),
    ],
    floor: s(1),
};

pub const CHEST_WIDTH: ScoreTable = ScoreTable::AtLeast {
    steps: &[
        (300.0, s(9)),
        (280.0, s(8)),
        (260.0, s(7)),
        (240.0, s(6)),
        (220.0, s(5)),
        (200.0, s(4)),
        (180.0, s(3)),
        (160.0, s(2)),
    ],
    floor: s(1),
};

/// Front and rear teat placement share one table
pub const TEAT_PLACEMENT: ScoreTable = ScoreTable::Bands {
    bands: &[
        (60.0, 80.0, s(9)),
        (55.0, 85.0, s(8)),
        (50.0, 90.0, s(7)),
        (45.0, 95.0, s(6)),
        (40.0, 100.0, s(5)),
        (35.0, 105.0, s(4)),
        (30.0, 110.0, s(3)),
    ],
    outside: s(2),
};

pub const TEAT_LENGTH: ScoreTable = ScoreTable::Bands {
    bands: &[(40.0, 60.0, s(9)), (35.0, 65.0, s(8)), (30.0, 70.0, s(7)), (25.0, 75.0, s(6)), (20.0, 80.0, s(5))],
    outside: s(3),
};

pub const TEAT_THICKNESS: ScoreTable = ScoreTable::Bands {
    bands: &[(12.0, 18.0, s(9)), (10.0, 20.0, s(8)), (8.0, 22.0, s(7)), (6.0, 24.0, s(6))],
    outside: s(5),
};

pub const REAR_UDDER_WIDTH: ScoreTable = ScoreTable::AtLeast {
    steps: &[(100.0, s(9)), (90.0, s(8)), (80.0, s(7)), (70.0, s(6)), (60.0, s(5))],
    floor: s(4),
};

pub const REAR_UDDER_HEIGHT: ScoreTable = ScoreTable::AtLeast {
    steps: &[(200.0, s(9)), (180.0, s(8)), (160.0, s(7)), (140.0, s(6)), (120.0, s(5))],
    floor: s(4),
};

/// Angle at the udder/body wall intersection, in degrees
pub const FORE_UDDER_ATTACHMENT: ScoreTable = ScoreTable::AtLeast {
    steps: &[(140.0, s(9)), (130.0, s(8)), (120.0, s(7)), (110.0, s(6)), (100.0, s(5)), (90.0, s(4))],
    floor: s(3),
};

pub const UDDER_DEPTH: ScoreTable = ScoreTable::Bands {
    bands: &[(20.0, 40.0, s(9)), (15.0, 50.0, s(8)), (10.0, 60.0, s(7)), (5.0, 70.0, s(6))],
    outside: s(5),
};

pub const CENTRAL_LIGAMENT: ScoreTable = ScoreTable::AtLeast {
    steps: &[(50.0, s(9)), (45.0, s(8)), (40.0, s(7)), (35.0, s(6)), (30.0, s(5))],
    floor: s(4),
};
