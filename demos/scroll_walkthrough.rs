use scrollpill::sim::{Harness, SimBackend};
use scrollpill::{ElementRole, Prop, RegionId, ScrollEvent, StageConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => StageConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => StageConfig::default(),
    };
    let mut h = Harness::new(cfg, SimBackend::new(1280.0, 800.0))?;

    h.scroll(RegionId::Pill, ScrollEvent::Enter);
    h.advance(2.2);
    println!("after enter: {:?}", h.stage().pill_state());

    for i in 0..=20 {
        h.progress(RegionId::Scale, f64::from(i) / 20.0);
        h.advance(0.1);
    }
    println!(
        "after scale: {:?}, mockup scale {:.4}",
        h.stage().text_state(),
        h.backend().prop(ElementRole::Mockup, Prop::Scale)
    );

    for i in 0..=10 {
        h.progress(RegionId::Handoff, f64::from(i) / 10.0);
        h.frame();
    }
    h.advance(3.0);
    println!(
        "after handoff: done={}, spacer height {:?}",
        h.stage().pill_state().transform_handoff_done,
        h.backend().style(ElementRole::Spacer, "height")
    );

    h.scroll(RegionId::Pill, ScrollEvent::LeaveBack);
    h.advance(1.2);
    println!(
        "after leave-back: {:?} / {:?}",
        h.stage().pill_state(),
        h.stage().text_state()
    );
    Ok(())
}
