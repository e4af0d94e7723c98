#![allow(dead_code)]

use std::sync::Arc;

use puzzle_core::MemoryLogger;
use puzzle_runtime::{Runtime, RuntimeConfig};

/// Push puzzle; level 0 is won by two pushes to the right, level 1 is boxed in.
pub const SOKOBAN: &str = "\
title Scenario Push

========
OBJECTS
========

Background
black

Target
purple

Player
blue

Box
orange

Wall
grey

=======
LEGEND
=======

. = Background
P = Player
B = Box
# = Wall
T = Target
@ = Box and Target

================
COLLISIONLAYERS
================

Background
Target
Player, Box, Wall

======
RULES
======

[ > Player | Box | no Wall no Box ] -> [ | Player | Box ]
[ > Player | no Wall no Box ] -> [ | Player ]

==============
WINCONDITIONS
==============

all Box on Target

=======
LEVELS
=======

#PB.T@#

#PB##
";

/// Larger board for randomized play.
pub const WAREHOUSE: &str = "\
OBJECTS
Background
black

Target
purple

Player
blue

Box
orange

Wall
grey

LEGEND
. = Background
P = Player
B = Box
# = Wall
T = Target

COLLISIONLAYERS
Background
Target
Player, Box, Wall

RULES
[ > Player | Box | no Wall no Box ] -> [ | Player | Box ]
[ > Player | no Wall no Box ] -> [ | Player ]

WINCONDITIONS
all Box on Target

LEVELS
#######
#P.B..#
#.B.#.#
#..T..#
#T..B.#
#...T.#
#######
";

/// Stepping onto a trap cancels the turn; reaching the goal wins it.
pub const TRAPS: &str = "\
OBJECTS
Background
black

Player
blue

Trap
red

Goal
yellow

LEGEND
. = Background
P = Player
X = Trap
G = Goal

COLLISIONLAYERS
Background
Trap, Goal
Player

RULES
[ > Player | ] -> [ | Player ]
[ Player Trap ] -> cancel
[ Player Goal ] -> win

LEVELS
XP.G
";

pub fn runtime_with(source: &str, config: RuntimeConfig) -> (Runtime, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let mut runtime = Runtime::builder()
        .config(config)
        .logger(logger.clone())
        .build();
    runtime.load_game(source).expect("test game compiles");
    (runtime, logger)
}

pub fn runtime(source: &str) -> (Runtime, Arc<MemoryLogger>) {
    runtime_with(source, RuntimeConfig::default())
}
