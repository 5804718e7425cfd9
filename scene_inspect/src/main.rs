use anyhow::{Context, Result};
use clap::{Arg, Command};
use scenefile::foundation::{logging, math::utils};
use scenefile::prelude::*;
use std::path::PathBuf;

fn main() -> Result<()> {
    logging::init_with_default("info");

    let matches = Command::new("scene_inspect")
        .about("Parses a scene description file and prints what it contains")
        .arg(
            Arg::new("scene")
                .value_name("FILE")
                .help("Scene file to parse")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Parser settings (.toml or .ron)"),
        )
        .arg(
            Arg::new("tree")
                .long("tree")
                .help("Dump the scene graph depth-first")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let scene_path = PathBuf::from(
        matches
            .get_one::<String>("scene")
            .context("No scene file given")?,
    );

    let config = match matches.get_one::<String>("config") {
        Some(path) => ParserConfig::load_from_file(path)
            .with_context(|| format!("Failed to load parser settings from {path}"))?,
        None => ParserConfig::default(),
    };

    let scene = SceneParser::with_config(config)
        .parse_file(&scene_path)
        .with_context(|| format!("Failed to parse {}", scene_path.display()))?;

    print_summary(&scene);
    if matches.get_flag("tree") {
        print_tree(&scene)?;
    }
    Ok(())
}

fn print_summary(scene: &ParseResult) {
    println!("Scene: {}", scene.name().unwrap_or("(unnamed)"));

    let global = scene.global_data();
    println!(
        "Global: ka={} kd={} ks={} kt={}",
        global.ambient, global.diffuse, global.specular, global.transparent
    );

    let camera = scene.camera_data();
    println!(
        "Camera: position={} look={} up={} height angle={:.1} deg",
        fmt_vec3(&camera.position),
        fmt_vec3(&camera.look),
        fmt_vec3(&camera.up),
        utils::rad_to_deg(camera.height_angle)
    );
    if camera.aperture > 0.0 {
        println!("        aperture={} focal length={}", camera.aperture, camera.focal_length);
    }

    println!("Lights: {}", scene.lights().len());
    for light in scene.lights() {
        let placement = match light.light_type {
            LightType::Directional => format!("direction={}", fmt_vec3(&light.direction)),
            LightType::Point => format!("position={}", fmt_vec3(&light.position)),
            LightType::Spot | LightType::Area => format!(
                "position={} direction={}",
                fmt_vec3(&light.position),
                fmt_vec3(&light.direction)
            ),
        };
        println!(
            "  #{} {} color=({}, {}, {}) {}",
            light.id, light.light_type, light.color.r, light.color.g, light.color.b, placement
        );
    }

    let graph = scene.graph();
    println!("Nodes: {} ({} named)", graph.len(), graph.names().len());
}

fn print_tree(scene: &ParseResult) -> Result<()> {
    let graph = scene.graph();
    graph.walk(scene.root(), |visit| {
        let indent = "  ".repeat(visit.depth);
        let label = graph.name_of(visit.handle).unwrap_or("group");
        if visit.revisit {
            println!("{indent}{label} [shared]");
            return;
        }

        let transforms: Vec<&str> = visit.node.transformations.iter().map(Transformation::kind_name).collect();
        println!("{indent}{label} transforms=[{}]", transforms.join(", "));
        for primitive in &visit.node.primitives {
            match &primitive.kind {
                PrimitiveKind::Mesh { path } => println!("{indent}  * mesh {}", path.display()),
                kind => println!("{indent}  * {kind}"),
            }
        }
    })?;
    Ok(())
}

fn fmt_vec3(v: &Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}
