mod state_machine_tests;
