//! Built-in norns prompt corpus
//!
//! Metadata mirrors the prompt repository layout: orientation material,
//! task workflows, API and pattern references, mod and engine guides,
//! softcut guides and hardware guides. Content is carried as-is and never
//! interpreted by the pipeline. Sizes are token estimates.

use crate::types::{Category, Document};

pub const CORPUS_VERSION: &str = "builtin-2024.1";

/// Documents of the built-in corpus, in catalog order
pub fn builtin_documents() -> Vec<Document> {
    use Category::*;

    vec![
        // Tier 0: always shipped
        Document::new("core.agents", Reference, 0, 1200)
            .requires(&["core.lua_style"])
            .content("How to work with the user on norns scripts: confirm the goal, keep scripts runnable at every step, prefer small iterations and explain changes."),
        Document::new("core.lua_style", Reference, 0, 600)
            .content("Lua conventions for norns: local by default, init/redraw/cleanup lifecycle, params for user-facing state, no blocking calls in callbacks."),

        // Task workflows
        Document::new("tasks.create", Task, 1, 1800)
            .requires(&["reference.api"])
            .conflicts(&["tasks.create_mod", "tasks.create_engine"])
            .content("Workflow for a new script: sketch the interaction, scaffold init/redraw/key/enc, add params, then iterate on sound and screen."),
        Document::new("tasks.create_mod", Task, 1, 1600)
            .requires(&["mods.reference"])
            .conflicts(&["tasks.create_engine"])
            .content("Workflow for a new mod: choose hooks, register the mod, keep state system-wide and survive script changes."),
        Document::new("tasks.create_engine", Task, 1, 1700)
            .requires(&["engines.reference"])
            .content("Workflow for a new engine: write the SynthDef, expose commands, register the engine class and test from Lua."),
        Document::new("tasks.understand", Task, 1, 900)
            .content("Workflow for explaining existing code: trace the lifecycle, name the data flow, point at the relevant API surface."),
        Document::new("tasks.enhance", Task, 1, 1100)
            .content("Workflow for extending a script: read before writing, preserve existing params, add features behind clear controls."),
        Document::new("tasks.bugfix", Task, 1, 1000)
            .requires(&["reference.debugging"])
            .content("Workflow for fixing bugs: reproduce with maiden output, isolate the callback, fix minimally, verify on device."),

        // Script reference
        Document::new("reference.api", Reference, 1, 3200)
            .content("Core norns API: screen, params, clock, metro, util, controlspec, audio and the script lifecycle callbacks."),
        Document::new("reference.patterns", Reference, 1, 2400)
            .requires(&["reference.api"])
            .content("Proven script patterns: clock-driven sequencers, param-backed state, screen redraw throttling, PSET handling."),
        Document::new("reference.debugging", Reference, 2, 1300)
            .content("Debugging on norns: maiden REPL, print tracing, common nil errors, clock and metro pitfalls."),
        Document::new("reference.examples", Reference, 3, 2800)
            .requires(&["reference.patterns"])
            .content("Annotated example scripts from minimal to feature-complete, graded by complexity."),

        // Mods
        Document::new("mods.reference", Mod, 1, 1400)
            .content("Mod terminology and hook API: system_post_startup, script_pre_init, script_post_cleanup, menu integration."),
        Document::new("mods.patterns", Mod, 1, 1500)
            .requires(&["mods.reference"])
            .content("Mod patterns: wrapping script callbacks safely, persistent settings, menu pages."),

        // Engines
        Document::new("engines.reference", Engine, 2, 1600)
            .content("Engine architecture: CroneEngine subclasses, command definitions, polls and the Lua engine bridge."),
        Document::new("engines.patterns", Engine, 1, 2100)
            .requires(&["engines.reference"])
            .content("Engine patterns: voice allocation, bus routing, parameter smoothing, freeing synths."),
        Document::new("engines.osc_testing", Engine, 2, 900)
            .requires(&["engines.patterns"])
            .content("Testing engines over OSC from SuperCollider and Lua before wiring a full script."),
        Document::new("engines.integration", Engine, 2, 1000)
            .requires(&["reference.api"])
            .content("Using an existing engine from a script: engine.name, command calls, params bound to engine commands."),

        // Softcut
        Document::new("softcut.reference", Softcut, 2, 2200)
            .content("Softcut API: voices, buffers, rec/pre levels, loop points, rate, phase polls and buffer I/O."),
        Document::new("softcut.workflow", Softcut, 2, 1400)
            .requires(&["softcut.reference"])
            .content("Building record/loop/sample features with softcut: buffer planning, overdub, tape-style looping."),

        // Hardware
        Document::new("hardware.grid", Hardware, 2, 1200)
            .content("Grid integration: grid.connect, key callbacks, LED state buffers and redraw clocks."),
        Document::new("hardware.arc", Hardware, 2, 900)
            .content("Arc integration: arc.connect, delta handling, ring LED rendering."),
        Document::new("hardware.midi", Hardware, 2, 1000)
            .content("MIDI integration: device ports, event parsing, clock sync and note output."),
    ]
}
