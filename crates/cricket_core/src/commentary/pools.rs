//! Fixed line pools, one per commentary kind.

use super::CommentaryKind;

pub fn lines(kind: CommentaryKind) -> &'static [&'static str] {
    match kind {
        CommentaryKind::Six => SIX,
        CommentaryKind::Four => FOUR,
        CommentaryKind::Dot => DOT,
        CommentaryKind::Wicket => WICKET,
        CommentaryKind::Pressure => PRESSURE,
        CommentaryKind::OverEnd => OVER_END,
        CommentaryKind::Timeout => TIMEOUT,
        CommentaryKind::InningsBreak => INNINGS_BREAK,
        CommentaryKind::MatchEnd => MATCH_END,
    }
}

const SIX: &[&str] = &[
    "That's a massive six!",
    "Cleared the ropes with ease!",
    "Out of the park!",
    "One swing, six runs!",
    "That flew into the stands!",
    "Maximum! What a hit!",
    "That's gone all the way!",
    "Huge strike, six runs added!",
    "No doubt about that one!",
    "The crowd erupts as it sails over!",
];

const FOUR: &[&str] = &[
    "Cracking shot for four!",
    "Beautifully timed boundary.",
    "Placed perfectly, that's four.",
    "Finds the gap with precision.",
    "Four runs, no stopping that.",
    "Excellent timing from the batter.",
    "Races away to the boundary.",
    "That's a classy four.",
    "Controlled shot, easy boundary.",
    "Runs coming freely now.",
];

const DOT: &[&str] = &[
    "Dot ball, pressure building.",
    "Good bowling, no run.",
    "Tight line and length.",
    "No scoring opportunity there.",
    "Batters forced to defend.",
    "Another dot, pressure mounts.",
    "Bowler keeps it tight.",
    "Nothing off that delivery.",
    "Runs hard to come by.",
    "Dot ball at an important moment.",
];

const WICKET: &[&str] = &[
    "Wicket! Big breakthrough!",
    "Gone! That's a huge moment.",
    "The batter has to walk back.",
    "That wicket changes the game.",
    "Bowling side strikes at the right time.",
    "A massive wicket falls.",
    "Breakthrough for the bowling team!",
    "That could be a turning point.",
    "The crowd senses a shift here.",
    "Wicket at a crucial stage!",
];

const PRESSURE: &[&str] = &[
    "Dot balls piling up.",
    "Pressure mounting on the batting side.",
    "Bowler applying serious pressure.",
    "Runs drying up quickly.",
    "The batter is feeling the squeeze.",
    "Momentum slowing down.",
    "This spell is tightening things up.",
    "Bowling side gaining control.",
    "Batting side under pressure now.",
    "Every run is being earned.",
];

const OVER_END: &[&str] = &[
    "That's the end of the over.",
    "Over completed.",
    "Bowler finishes the over.",
    "Another over in the books.",
    "End of a disciplined over.",
    "The over comes to a close.",
    "Time to reset for the next over.",
    "Bowler completes the set.",
    "Over done, pressure maintained.",
    "That wraps up the over.",
];

const TIMEOUT: &[&str] = &[
    "Match paused for a timeout.",
    "A short break in play.",
    "Timeout taken as teams regroup.",
    "Play halted momentarily.",
    "Timeout called on the field.",
    "A brief pause in the action.",
    "Teams take a moment to reset.",
];

const INNINGS_BREAK: &[&str] = &[
    "That's the end of the innings.",
    "Innings complete.",
    "A solid innings comes to an end.",
    "Teams head into the innings break.",
    "Time for a break before the next innings.",
    "The first innings is wrapped up.",
    "That concludes the innings.",
    "All set for the chase after the break.",
];

const MATCH_END: &[&str] = &[
    "That's the end of the match!",
    "What a contest it's been!",
    "Match completed.",
    "The final result is in.",
    "A thrilling finish to the game.",
    "The game comes to a close.",
    "That wraps up a fantastic match.",
    "Full time on a great contest.",
];
