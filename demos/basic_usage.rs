use package_prefs::{FileStore, PackageFilterTab, PackageManagerPrefs, ProjectId};

fn main() {
    // On native platforms this uses the config directory for the namespace.
    let store = FileStore::open("com.example.packagemanager").expect("Failed to load preferences");
    let project = ProjectId::new("2f6c9d8e4b1a").expect("Invalid project id");
    let mut prefs = PackageManagerPrefs::new(store, project);

    prefs.on_show_preview_packages_changed(|shown| {
        println!("Preview packages are now {}", if shown { "shown" } else { "hidden" });
    });

    println!("Current preferences:");
    println!("  Skip remove confirmation: {}", prefs.skip_remove_confirmation());
    println!("  Show dependencies: {}", prefs.show_package_dependencies());
    println!("  Show preview packages: {}", prefs.show_preview_packages());
    println!(
        "  Filter tab: {}",
        prefs.last_used_package_filter().unwrap_or(prefs.default_filter_tab())
    );

    // A preview package was found among the installed ones.
    prefs.set_show_preview_packages_from_installed(true);

    prefs
        .set_last_used_package_filter(Some(PackageFilterTab::All))
        .expect("Failed to save filter tab");
    prefs.set_num_items_per_page(Some(25));

    println!("\nPreferences stored at: {}", prefs.store().location());
}
