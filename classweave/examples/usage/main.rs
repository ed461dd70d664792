use classweave::{block, classes, compose, ComposedClassNameRequest, Container, HtmlSink, Node};

// This expands to
// mod toolbar {
//     pub const base: &str = "toolbar";
//     pub const top: &str = "toolbar--top";
//     pub const bottom: &str = "toolbar--bottom";
// }
// using the modifier_pattern from this crate's Cargo.toml.
block!(toolbar, "toolbar", [top, bottom]);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("toolbar at the top: {}", toolbar::top);

    // Compose a class attribute at runtime
    let request = ComposedClassNameRequest::new("toolbar")
        .location("top")
        .flag("toolbar-dense", true)
        .flag("toolbar-hidden", false);
    println!("composed: '{}'", compose(&request)?);

    // Or combine known classes with the classes! macro
    let active_tab = 0; // set to 1 to disable the active class!
    println!(
        "combined: '{}'",
        classes!(
            "some-global-class",
            toolbar::base,
            (active_tab == 0).then_some(toolbar::bottom)
        ),
    );

    // Render a toolbar wrapping its children
    let mut sink = HtmlSink::new();
    Container::toolbar(Some("bottom"))
        .child(Node::element("button", "primary").with_child(Node::text("Save")))
        .render(&mut sink)?;
    println!("{}", sink.finish()?);

    Ok(())
}
