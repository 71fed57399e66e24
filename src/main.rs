fn main() {
    clinic_queue::app::startup::startup();
}
