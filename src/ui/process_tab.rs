use gtk4 as gtk;
use gtk::prelude::*;
use gtk::glib;
use gtk::gio;
use gtk::subclass::prelude::ObjectSubclassIsExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::{is_critical_process, Collector, SelectionState, SystemSource};
use crate::model::ProcessEntry;

// GObject wrapper for one row of the process table
mod imp {
    use gtk4 as gtk;
    use gtk::glib;
    use gtk::subclass::prelude::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    pub struct ProcessObject {
        pub pid: Cell<u32>,
        pub name: RefCell<String>,
        pub threads: Cell<u64>,
        pub memory: RefCell<String>,
        pub memory_available: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ProcessObject {
        const NAME: &'static str = "DashboardProcessObject";
        type Type = super::ProcessObject;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for ProcessObject {}
}

glib::wrapper! {
    pub struct ProcessObject(ObjectSubclass<imp::ProcessObject>);
}

impl ProcessObject {
    pub fn new(entry: &ProcessEntry) -> Self {
        let obj: Self = glib::Object::builder().build();
        let imp = obj.imp();
        imp.pid.set(entry.pid);
        *imp.name.borrow_mut() = entry.name.clone();
        imp.threads.set(entry.threads);
        *imp.memory.borrow_mut() = entry.working_set.to_string();
        imp.memory_available.set(entry.working_set.is_available());
        obj
    }

    pub fn pid(&self) -> u32 { self.imp().pid.get() }
    pub fn name(&self) -> String { self.imp().name.borrow().clone() }
    pub fn threads(&self) -> u64 { self.imp().threads.get() }
    pub fn memory(&self) -> String { self.imp().memory.borrow().clone() }
    pub fn memory_available(&self) -> bool { self.imp().memory_available.get() }
}

pub struct ProcessTab {
    pub widget: gtk::ScrolledWindow,
    store: gio::ListStore,
    selection: gtk::SingleSelection,
    column_view: gtk::ColumnView,
    selection_state: Rc<RefCell<SelectionState>>,
    // Set while the store is rebuilt so the transient empty selection
    // is not mistaken for the user clearing it
    rebuilding: Rc<Cell<bool>>,
}

impl ProcessTab {
    pub fn new() -> Self {
        let store = gio::ListStore::new::<ProcessObject>();

        let selection = gtk::SingleSelection::new(Some(store.clone()));
        selection.set_autoselect(false);
        selection.set_can_unselect(true);

        let column_view = gtk::ColumnView::new(Some(selection.clone()));
        column_view.set_show_column_separators(true);
        column_view.set_show_row_separators(true);
        column_view.add_css_class("process-view");

        add_text_column(&column_view, "Name", 240, gtk::Align::Start, |obj, label| {
            label.set_text(&obj.name());
        });
        add_text_column(&column_view, "PID", 80, gtk::Align::End, |obj, label| {
            label.set_text(&obj.pid().to_string());
        });
        add_text_column(&column_view, "Threads", 80, gtk::Align::End, |obj, label| {
            label.set_text(&obj.threads().to_string());
        });
        add_text_column(&column_view, "Memory", 120, gtk::Align::End, |obj, label| {
            label.set_text(&obj.memory());
            if obj.memory_available() {
                label.remove_css_class("dim-label");
            } else {
                label.add_css_class("dim-label");
            }
        });

        let selection_state = Rc::new(RefCell::new(SelectionState::default()));
        let rebuilding = Rc::new(Cell::new(false));

        let state_for_sel = selection_state.clone();
        let rebuilding_for_sel = rebuilding.clone();
        selection.connect_notify_local(Some("selected"), move |sel, _| {
            if rebuilding_for_sel.get() {
                return;
            }
            let pid = sel
                .selected_item()
                .and_downcast::<ProcessObject>()
                .map(|obj| obj.pid());
            state_for_sel.borrow_mut().select(pid);
        });

        let widget = gtk::ScrolledWindow::builder()
            .child(&column_view)
            .vexpand(true)
            .hexpand(true)
            .build();

        Self {
            widget,
            store,
            selection,
            column_view,
            selection_state,
            rebuilding,
        }
    }

    /// Replaces every row with `entries`, keeping the selected process
    /// selected (and in view) if it still exists.
    pub fn update(&self, entries: Vec<ProcessEntry>) {
        let reconciled = self.selection_state.borrow_mut().reconcile(entries);
        let objects: Vec<ProcessObject> = reconciled.rows.iter().map(ProcessObject::new).collect();

        self.rebuilding.set(true);
        self.store.splice(0, self.store.n_items(), &objects);
        match reconciled.selected_index {
            Some(index) => {
                let pos = index as u32;
                self.selection.set_selected(pos);
                self.column_view
                    .scroll_to(pos, None, gtk::ListScrollFlags::FOCUS, None);
            }
            None => self.selection.set_selected(gtk::INVALID_LIST_POSITION),
        }
        self.rebuilding.set(false);
    }

    /// PID and name of the selected row.
    pub fn selected(&self) -> Option<(u32, String)> {
        let pid = self.selection_state.borrow().selected_pid?;
        let obj = self
            .selection
            .selected_item()
            .and_downcast::<ProcessObject>()
            .filter(|obj| obj.pid() == pid)?;
        Some((pid, obj.name()))
    }

    pub fn row_count(&self) -> u32 {
        self.store.n_items()
    }
}

fn add_text_column(
    view: &gtk::ColumnView,
    title: &str,
    width: i32,
    align: gtk::Align,
    bind: fn(&ProcessObject, &gtk::Label),
) {
    let factory = gtk::SignalListItemFactory::new();
    factory.connect_setup(move |_, item| {
        let Some(item) = item.downcast_ref::<gtk::ListItem>() else {
            return;
        };
        let label = gtk::Label::new(None);
        label.set_halign(align);
        label.set_ellipsize(gtk::pango::EllipsizeMode::End);
        item.set_child(Some(&label));
    });
    factory.connect_bind(move |_, item| {
        let Some(item) = item.downcast_ref::<gtk::ListItem>() else {
            return;
        };
        let obj = item.item().and_downcast::<ProcessObject>();
        let label = item.child().and_downcast::<gtk::Label>();
        if let (Some(obj), Some(label)) = (obj, label) {
            bind(&obj, &label);
        }
    });

    let column = gtk::ColumnViewColumn::new(Some(title), Some(factory));
    column.set_fixed_width(width);
    column.set_resizable(true);
    if title == "Name" {
        column.set_expand(true);
    }
    view.append_column(&column);
}

/// Ends the selected process, asking first if it looks critical.
pub fn end_selected_process<S: SystemSource + 'static>(
    tab: &Rc<ProcessTab>,
    collector: &Rc<RefCell<Collector<S>>>,
    confirm_critical: bool,
) {
    let Some((pid, name)) = tab.selected() else {
        return;
    };

    if confirm_critical && is_critical_process(pid, &name) {
        let msg = format!(
            "\"{}\" (PID {}) is a critical system process.\n\nEnding it may crash your session.\n\nAre you sure you want to end it?",
            name, pid
        );
        let tab_c = tab.clone();
        let collector_c = collector.clone();
        show_confirm_dialog(&tab.widget, &msg, move || {
            do_kill(&tab_c, &collector_c, pid, &name);
        });
        return;
    }

    do_kill(tab, collector, pid, &name);
}

fn do_kill<S: SystemSource>(
    tab: &ProcessTab,
    collector: &RefCell<Collector<S>>,
    pid: u32,
    name: &str,
) {
    let result = collector.borrow().terminate(pid);
    match result {
        Ok(()) => {
            let entries = collector.borrow().refresh_processes();
            tab.update(entries);
        }
        Err(e) => {
            let msg = format!(
                "Failed to terminate \"{}\" (PID {})\n\n{}\n\nTry launching System Dashboard with elevated privileges.",
                name, pid, e
            );
            show_error_dialog(&tab.widget, &msg);
        }
    }
}

fn show_confirm_dialog(widget: &impl IsA<gtk::Widget>, message: &str, on_accept: impl Fn() + 'static) {
    let window = widget.root()
        .and_then(|r| r.downcast::<gtk::Window>().ok());

    let dialog = gtk::MessageDialog::new(
        window.as_ref(),
        gtk::DialogFlags::MODAL | gtk::DialogFlags::DESTROY_WITH_PARENT,
        gtk::MessageType::Warning,
        gtk::ButtonsType::None,
        message,
    );
    dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let action_btn = dialog.add_button("End Anyway", gtk::ResponseType::Accept);
    action_btn.add_css_class("destructive-action");

    dialog.connect_response(move |d, response| {
        // Close first so an error dialog raised by the action is not stacked under it
        d.close();
        if response == gtk::ResponseType::Accept {
            on_accept();
        }
    });
    dialog.present();
}

fn show_error_dialog(widget: &impl IsA<gtk::Widget>, message: &str) {
    let window = widget.root()
        .and_then(|r| r.downcast::<gtk::Window>().ok());

    let dialog = gtk::MessageDialog::new(
        window.as_ref(),
        gtk::DialogFlags::MODAL | gtk::DialogFlags::DESTROY_WITH_PARENT,
        gtk::MessageType::Error,
        gtk::ButtonsType::Ok,
        message,
    );
    dialog.connect_response(|d, _| d.close());
    dialog.present();
}
