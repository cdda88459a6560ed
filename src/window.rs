use gtk4 as gtk;
use gtk::prelude::*;
use gtk::glib;
use libadwaita as adw;
use adw::prelude::*;

use crate::backend::{Collector, ProcSource};
use crate::config::Config;
use crate::ui::graph_widget::GraphWidget;
use crate::ui::process_tab::{self, ProcessTab};
use crate::util;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct MainWindow;

impl MainWindow {
    pub fn new(app: &adw::Application) -> adw::ApplicationWindow {
        let config = Config::load();

        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title("System Dashboard")
            .default_width(config.window_width)
            .default_height(config.window_height)
            .build();

        let collector = Rc::new(RefCell::new(Collector::new(
            ProcSource::new(),
            config.process_refresh_ticks,
            config.kill_signal,
        )));

        let graphs = Rc::new(GraphWidget::new(config.graph_height, collector.clone()));

        let process_tab = Rc::new(ProcessTab::new());
        process_tab.update(collector.borrow().refresh_processes());

        // Bottom bar: status on the left, kill button on the right
        let status_bar = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        status_bar.add_css_class("status-bar");
        let status_processes = gtk::Label::new(Some(&format!("Processes: {}", process_tab.row_count())));
        let status_cpu = gtk::Label::new(Some("CPU: 0.0%"));
        let status_memory = gtk::Label::new(Some("Memory: 0.0%"));
        status_bar.append(&status_processes);
        status_bar.append(&status_cpu);
        status_bar.append(&status_memory);

        let spacer = gtk::Box::new(gtk::Orientation::Horizontal, 0);
        spacer.set_hexpand(true);
        status_bar.append(&spacer);

        let end_button = gtk::Button::with_label("End Selection");
        end_button.add_css_class("destructive-action");
        status_bar.append(&end_button);

        {
            let tab = process_tab.clone();
            let collector = collector.clone();
            let confirm = config.confirm_critical_kill;
            end_button.connect_clicked(move |_| {
                process_tab::end_selected_process(&tab, &collector, confirm);
            });
        }

        let header = adw::HeaderBar::new();

        let main_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        main_box.append(&header);
        main_box.append(&graphs.widget);
        main_box.append(&gtk::Separator::new(gtk::Orientation::Horizontal));
        main_box.append(&process_tab.widget);
        main_box.append(&gtk::Separator::new(gtk::Orientation::Horizontal));
        main_box.append(&status_bar);

        window.set_content(Some(&main_box));

        let interval = Duration::from_millis(config.refresh_interval_ms.max(1));
        let source_id = {
            let collector = collector.clone();
            let process_tab = process_tab.clone();
            let graphs = graphs.clone();
            glib::timeout_add_local(interval, move || {
                let report = collector.borrow_mut().tick();

                if let Some(entries) = report.processes {
                    process_tab.update(entries);
                    status_processes.set_text(&format!("Processes: {}", process_tab.row_count()));
                }
                status_cpu.set_text(&format!("CPU: {}", util::format_percent(report.sample.cpu_percent)));
                status_memory.set_text(&format!("Memory: {}", util::format_percent(report.sample.mem_percent)));

                graphs.queue_redraw();
                glib::ControlFlow::Continue
            })
        };
        let source_id = RefCell::new(Some(source_id));

        // Stop sampling and save window size on close
        window.connect_close_request(move |win| {
            if let Some(id) = source_id.borrow_mut().take() {
                id.remove();
            }
            let mut cfg = config.clone();
            cfg.window_width = win.width();
            cfg.window_height = win.height();
            cfg.save();
            glib::Propagation::Proceed
        });

        window
    }
}
