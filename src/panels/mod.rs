pub mod chart_ui;
pub mod controls_ui;
pub mod gauge_ui;
pub mod help_ui;
pub mod panel_trait;
pub mod table_ui;

pub use chart_ui::TrialsChartPanel;
pub use controls_ui::ControlsPanel;
pub use gauge_ui::GaugePanel;
pub use help_ui::HelpWindow;
pub use panel_trait::Panel;
pub use table_ui::TrialsTablePanel;
